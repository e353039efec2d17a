use std::sync::Arc;
use std::thread::spawn;

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::*;

/// Identifies one submitted lookup.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct RequestToken(pub u64);

impl std::fmt::Display for RequestToken {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
pub struct GeocodeCompletion {
    pub token: RequestToken,
    pub result: Result<Vec<Place>, GeocodeError>,
}

/// The asynchronous side of a geocoder as seen from the UI thread.
///
/// `request` must not block. Every request is answered exactly once through `poll`.
pub trait GeocodeClient {
    fn request(&mut self, token: RequestToken, query: String);
    fn poll(&mut self) -> Option<GeocodeCompletion>;
}

/// Runs lookups of a blocking `Geocoder` on their own threads.
pub struct GeocodeWorker<G> {
    geocoder: Arc<G>,
    channel: (Sender<GeocodeCompletion>, Receiver<GeocodeCompletion>),
}

impl<G: Geocoder + 'static> GeocodeWorker<G> {
    pub fn new(geocoder: G) -> Self {
        Self {
            geocoder: Arc::new(geocoder),
            channel: unbounded(),
        }
    }
}

impl<G: Geocoder + 'static> GeocodeClient for GeocodeWorker<G> {
    fn request(&mut self, token: RequestToken, query: String) {
        let geocoder = self.geocoder.clone();
        let tx = self.channel.0.clone();

        spawn(move || {
            log::debug!("Looking up {:?} for request {}.", query, token);
            let result = geocoder.geocode(&query);
            if let Err(e) = &result {
                log::warn!("Lookup of {:?} failed. Reason:\r\n{}", query, e);
            }
            if tx.send(GeocodeCompletion { token, result }).is_err() {
                log::debug!("Could not send the lookup result. This most likely happened because the app was terminated.")
            }
        });
    }

    fn poll(&mut self) -> Option<GeocodeCompletion> {
        self.channel.1.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    struct Gazetteer;

    impl Geocoder for Gazetteer {
        fn geocode(&self, query: &str) -> Result<Vec<Place>, GeocodeError> {
            match query {
                "Taipei 101" => Ok(vec![Place {
                    label: "Taipei 101".to_string(),
                    center: Position::new(25.0330, 121.5654).unwrap(),
                }]),
                "offline" => Err(GeocodeError::Status(503)),
                _ => Ok(vec![]),
            }
        }
    }

    fn wait_for(worker: &mut GeocodeWorker<Gazetteer>, count: usize) -> Vec<GeocodeCompletion> {
        let start = Instant::now();
        let mut completions = vec![];
        while completions.len() < count && start.elapsed() < Duration::from_secs(10) {
            match worker.poll() {
                Some(completion) => completions.push(completion),
                None => std::thread::sleep(Duration::from_millis(1)),
            }
        }
        completions.sort_by_key(|c| c.token);
        completions
    }

    #[test]
    fn answers_every_request_with_its_token() {
        let mut worker = GeocodeWorker::new(Gazetteer);
        worker.request(RequestToken(1), "Taipei 101".to_string());
        worker.request(RequestToken(2), "Atlantis".to_string());
        worker.request(RequestToken(3), "offline".to_string());

        let completions = wait_for(&mut worker, 3);
        assert_eq!(completions.len(), 3);
        assert_eq!(completions[0].token, RequestToken(1));
        assert_eq!(completions[0].result.as_ref().unwrap().len(), 1);
        assert!(completions[1].result.as_ref().unwrap().is_empty());
        assert!(matches!(completions[2].result, Err(GeocodeError::Status(503))));
    }

    #[test]
    fn nothing_to_poll_without_requests() {
        let mut worker = GeocodeWorker::new(Gazetteer);
        assert!(worker.poll().is_none());
    }
}

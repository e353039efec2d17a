mod app_state;
mod config;
mod drawing;
mod stats;

use crate::config::CONFIG;
use waypoint::*;
use winit::{
    event::{ElementState, Event, KeyboardInput, ModifiersState, VirtualKeyCode, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
};

fn key_press(keycode: VirtualKeyCode, modifiers: ModifiersState) -> KeyPress {
    let key = match keycode {
        VirtualKeyCode::K => Key::K,
        VirtualKeyCode::Escape => Key::Escape,
        VirtualKeyCode::Return | VirtualKeyCode::NumpadEnter => Key::Enter,
        _ => Key::Other,
    };
    KeyPress::new(key, modifiers.ctrl())
}

fn main() {
    let mut logger = pretty_env_logger::formatted_builder();
    logger.filter_level(CONFIG.general.log_level.to_level_filter());
    if let Ok(filters) = std::env::var("RUST_LOG") {
        logger.parse_filters(&filters);
    }
    logger.init();

    let event_loop = EventLoop::new();
    let mut painter = drawing::Painter::init(&event_loop, CONFIG.window.width, CONFIG.window.height);
    let size = painter
        .window
        .inner_size()
        .to_logical::<f64>(painter.window.scale_factor());

    let mut app_state = match app_state::AppState::new(size.width, size.height) {
        Ok(app_state) => app_state,
        Err(e) => {
            log::error!("The configured map center is unusable. Reason:\r\n{}", e);
            std::process::exit(1);
        }
    };
    let mut hud = drawing::ui::Hud::new(&painter.window, &painter.device, painter.surface_format());

    let mut modifiers = ModifiersState::empty();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        // Shortcuts are taken away from the UI, so Control+K never reaches the search input.
        let consumed = match &event {
            Event::WindowEvent {
                event:
                    WindowEvent::KeyboardInput {
                        input:
                            KeyboardInput {
                                virtual_keycode: Some(keycode),
                                state: ElementState::Pressed,
                                ..
                            },
                        ..
                    },
                ..
            } => app_state.shortcuts.publish(key_press(*keycode, modifiers)),
            _ => false,
        };
        if !consumed {
            hud.interact(&event);
        }

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::Destroyed | WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(physical_size) => {
                    painter.resize(physical_size.width, physical_size.height);
                }
                WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                    painter.resize(new_inner_size.width, new_inner_size.height);
                }
                WindowEvent::ModifiersChanged(state) => {
                    modifiers = state;
                }
                _ => (),
            },
            Event::MainEventsCleared => {
                app_state.update();
                painter.paint(&mut hud, &mut app_state);

                app_state.stats.capture_frame();
            }
            _ => (),
        }
    });
}

#[test]
fn maps_keys_to_shortcuts() {
    let control = ModifiersState::CTRL;
    assert_eq!(
        Shortcut::for_key(key_press(VirtualKeyCode::K, control)),
        Some(Shortcut::OpenSearch)
    );
    assert_eq!(
        Shortcut::for_key(key_press(VirtualKeyCode::K, ModifiersState::empty())),
        None
    );
    assert_eq!(
        Shortcut::for_key(key_press(VirtualKeyCode::Escape, ModifiersState::empty())),
        Some(Shortcut::CloseSearch)
    );
    assert_eq!(key_press(VirtualKeyCode::NumpadEnter, control).key, Key::Enter);
}

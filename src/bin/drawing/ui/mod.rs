mod textures;

use std::time::Instant;

use egui::{Align2, Color32, FontDefinitions, Order};
use egui_wgpu_backend::{RenderPass, ScreenDescriptor};
use egui_winit_platform::{Platform, PlatformDescriptor};
use waypoint::*;

use crate::app_state::AppState;
use crate::config::CONFIG;
use textures::TileTextures;

/// How many zoom levels up a loaded tile may be borrowed from for a missing one.
const MAX_COVER_LEVELS: u32 = 4;

const BACKGROUND: Color32 = Color32::from_rgb(170, 211, 223);

pub struct Hud {
    platform: Platform,
    rpass: RenderPass,
    textures: TileTextures,
    start: Instant,
}

impl Hud {
    pub fn new(
        window: &winit::window::Window,
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
    ) -> Self {
        // We use the egui_winit_platform crate as the platform.
        let size = window.inner_size();
        let platform = Platform::new(PlatformDescriptor {
            physical_width: size.width as u32,
            physical_height: size.height as u32,
            scale_factor: window.scale_factor(),
            font_definitions: FontDefinitions::default(),
            style: Default::default(),
        });
        // We use the egui_wgpu_backend crate as the render backend.
        let rpass = RenderPass::new(device, format, 1);

        Self {
            platform,
            rpass,
            textures: TileTextures::new(),
            start: Instant::now(),
        }
    }

    pub fn paint(
        &mut self,
        app_state: &mut AppState,
        window: &winit::window::Window,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
    ) {
        self.platform
            .update_time(self.start.elapsed().as_secs_f64());

        // Begin to draw the UI frame.
        self.platform.begin_frame();

        let ctx = self.platform.context();
        self.map_ui(&ctx, app_state);
        search_ui(&ctx, &mut app_state.search);
        notice_ui(&ctx, &mut app_state.search);
        attribution_ui(&ctx, app_state);

        // End the UI frame. We could now handle the output and draw the UI with the backend.
        let full_output = self.platform.end_frame(Some(window));
        let paint_jobs = ctx.tessellate(full_output.shapes);

        // Upload all resources for the GPU.
        let size = window.inner_size();
        let screen_descriptor = ScreenDescriptor {
            physical_width: size.width,
            physical_height: size.height,
            scale_factor: window.scale_factor() as f32,
        };
        let tdelta: egui::TexturesDelta = full_output.textures_delta;
        if let Err(e) = self.rpass.add_textures(device, queue, &tdelta) {
            log::error!("Unable to upload UI textures. Reason:\r\n{:?}", e);
        }
        self.rpass
            .update_buffers(device, queue, &paint_jobs, &screen_descriptor);

        // Record all render passes.
        let clear = wgpu::Color {
            r: BACKGROUND.r() as f64 / 255.0,
            g: BACKGROUND.g() as f64 / 255.0,
            b: BACKGROUND.b() as f64 / 255.0,
            a: 1.0,
        };
        if let Err(e) = self
            .rpass
            .execute(encoder, view, &paint_jobs, &screen_descriptor, Some(clear))
        {
            log::error!("Unable to draw the UI. Reason:\r\n{:?}", e);
        }
        if let Err(e) = self.rpass.remove_textures(tdelta) {
            log::error!("Unable to free UI textures. Reason:\r\n{:?}", e);
        }
    }

    pub fn interact(&mut self, event: &winit::event::Event<()>) {
        self.platform.handle_event(event);
    }

    /// Draws the tiles and turns pointer input on the map into panning, zooming and
    /// clicks outside of the search panel.
    fn map_ui(&mut self, ctx: &egui::Context, app_state: &mut AppState) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(BACKGROUND))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                app_state
                    .map
                    .resize(rect.width() as f64, rect.height() as f64);
                let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());

                let painter = ui.painter_at(rect);
                let tile_field = app_state.map.visible_tiles();
                for tile_id in tile_field.iter() {
                    if let Some((tile, uv)) =
                        app_state.tile_cache.try_get_cover(&tile_id, MAX_COVER_LEVELS)
                    {
                        let texture = self.textures.get(ctx, &tile);
                        let (origin, size) = app_state.map.tile_rect(&tile_id);
                        let tile_rect = egui::Rect::from_min_size(
                            rect.min + egui::vec2(origin.x as f32, origin.y as f32),
                            egui::vec2(size as f32, size as f32),
                        );
                        let uv = egui::Rect::from_min_max(
                            egui::pos2(uv[0] as f32, uv[1] as f32),
                            egui::pos2(uv[2] as f32, uv[3] as f32),
                        );
                        painter.add(egui::Shape::image(texture.id(), tile_rect, uv, Color32::WHITE));
                    }
                }
                self.textures.retain(&tile_field);

                if response.dragged() {
                    let delta = response.drag_delta();
                    app_state.map.pan_by(delta.x as f64, delta.y as f64);
                }

                if let Some(pointer) = response.hover_pos() {
                    let scroll = ui.input().scroll_delta.y;
                    if scroll != 0.0 {
                        let anchor = pointer - rect.min;
                        app_state.map.zoom_by(
                            scroll as f64 * CONFIG.map.scroll_zoom_speed,
                            Some(nalgebra_glm::vec2(anchor.x as f64, anchor.y as f64)),
                        );
                    }
                }

                if response.clicked() {
                    app_state.search.click(ClickTarget::Outside);
                }
            });
    }
}

type Search = SearchController<GeocodeWorker<Nominatim>>;

fn backdrop(ctx: &egui::Context, name: &str) {
    let screen = ctx.input().screen_rect();
    ctx.layer_painter(egui::LayerId::new(Order::Middle, egui::Id::new(name)))
        .rect_filled(screen, 0.0, Color32::from_black_alpha(128));
}

fn search_ui(ctx: &egui::Context, search: &mut Search) {
    egui::Area::new("search_trigger")
        .anchor(Align2::CENTER_BOTTOM, [0.0, -8.0])
        .show(ctx, |ui| {
            if ui.button("🔍").clicked() {
                search.click(ClickTarget::SearchTrigger);
            }
        });

    if !search.state().accepts_input() {
        return;
    }

    backdrop(ctx, "search_backdrop");
    egui::Area::new("search_panel")
        .order(Order::Foreground)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.horizontal(|ui| {
                    let input = ui.add(
                        egui::TextEdit::singleline(search.query_mut())
                            .hint_text("search place...")
                            .desired_width(320.0),
                    );
                    if search.take_focus_request() {
                        input.request_focus();
                    }
                    if input.clicked() {
                        search.click(ClickTarget::SearchInput);
                    }
                    if input.lost_focus() && ui.input().key_pressed(egui::Key::Enter) {
                        search.submit(SubmitSource::Enter);
                    }

                    if ui.button("Search").clicked() {
                        search.click(ClickTarget::SearchButton);
                        search.submit(SubmitSource::Button);
                    }
                });
            });
        });
}

fn notice_ui(ctx: &egui::Context, search: &mut Search) {
    let notice = match &search.state().notice {
        Some(notice) => notice.clone(),
        None => return,
    };

    // The notice takes the place of the search panel and sits above every other layer.
    backdrop(ctx, "notice_backdrop");
    egui::Area::new("notice")
        .order(Order::Foreground)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            egui::Frame::window(ui.style()).show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(notice.message());
                    if ui.button("OK").clicked() {
                        search.dismiss_notice();
                    }
                });
            });
        });
}

fn attribution_ui(ctx: &egui::Context, app_state: &AppState) {
    egui::Area::new("attribution")
        .anchor(Align2::RIGHT_BOTTOM, [-4.0, -4.0])
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(&app_state.tile_cache.source().attribution).small());
            if CONFIG.general.display_framerate {
                let stats = app_state.tile_cache.get_stats();
                ui.label(
                    egui::RichText::new(format!(
                        "Frametime {:.2} at zoom {:.2}, tiles {} cached {} loading {} failed",
                        app_state.stats.get_average(),
                        app_state.map.zoom(),
                        stats.cached_tiles,
                        stats.loading_tiles,
                        stats.failed_tiles
                    ))
                    .small(),
                );
            }
        });
}

mod clock;
mod components;
mod config;
mod engine;
mod error;
mod model;
mod persistence;
mod random;
mod reducer;
mod session;
mod store;
mod util;

fn main() {
    util::init_logging();
    log::info!("Forgenite Frenzy starting");
    yew::Renderer::<components::app::App>::new().render();
}

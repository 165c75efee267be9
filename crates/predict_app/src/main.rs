mod app;
mod config;
mod effects;
mod logging;

fn main() {
    app::run();
}

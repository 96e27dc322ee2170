mod analysis;
mod app;
mod canvas;
mod channel;
mod dom;
mod net;
mod palette;
mod report;
mod state;

pub use app::run;

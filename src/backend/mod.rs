pub mod reveal;
pub mod session;
pub mod updater;
pub mod window;
pub mod xkcd;

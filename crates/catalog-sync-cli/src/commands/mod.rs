pub mod channels;
pub mod pending;
pub mod resync;
pub mod webhook;

// Domain layer: plain models and ports. No file system or watcher code here.

pub mod model;
pub mod ports;

//! Library side of the `resi` command: configuration, logging and
//! the read/map/validate stages shared by the `import` and `preview`
//! commands, and the import template writer.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod template;

//! Application orchestration module

pub mod initialization;
pub mod execution;

pub use initialization::{
    load_configuration,
    configure_logging,
    create_colour_manager,
    create_loader,
    resolve_output_format,
    resolve_semester
};
pub use execution::{
    run,
    run_dashboard
};

//! One-off data maintenance jobs run from the command line

pub mod connection_order;
pub mod coordinates;

pub use connection_order::{split_connection_order, SplitReport};
pub use coordinates::{
    import_coordinates, parse_position, parse_response, CoordinateProvider, CoordinateRecord,
    HttpCoordinateProvider, ImportError, ImportOptions, ImportReport,
};

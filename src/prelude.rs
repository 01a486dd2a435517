pub use log::{debug, trace};

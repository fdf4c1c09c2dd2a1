pub mod config;
pub mod error;
pub mod metrics;
pub mod model;
pub mod monitor;
pub mod sensor;
pub mod store;
pub mod visualization;

pub use config::{load_config, MonitorConfig};
pub use error::{DetectorError, MonitorError};
pub use model::{AnomalyModel, IsolationForest, Label};
pub use monitor::{Monitor, TickOutcome};
pub use sensor::{AnomalyDetector, DetectorState, SensorGenerator, SensorReading};
pub use store::ReadingLog;
pub use visualization::{ConsoleReport, Frame, HtmlDashboard, Presenter};

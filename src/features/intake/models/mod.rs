mod incident_report;

pub use incident_report::{IncidentReport, IncidentType, PhysicalHarmType};

// Presentation view model for analysis results. Emits data only; charts are
// drawn by the client.

pub mod views;
pub mod visuals;

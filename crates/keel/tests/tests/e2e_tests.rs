#[path = "e2e/stability_blend.rs"]
mod stability_blend;

#[path = "e2e/pattern_reinforcement.rs"]
mod pattern_reinforcement;

#[path = "e2e/failure_forecast.rs"]
mod failure_forecast;

#[path = "e2e/cascade_intervention.rs"]
mod cascade_intervention;

#[path = "e2e/operational_floor.rs"]
mod operational_floor;

#[path = "e2e/detection_worker.rs"]
mod detection_worker;

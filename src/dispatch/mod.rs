//! Dispatch page behaviour on top of the map
//!
//! [`ambulance::AmbulanceController`] owns the one ambulance marker,
//! [`renderer::StaticRouteRenderer`] draws a route result once,
//! [`tracker::LiveTracker`] follows a position stream and
//! [`view::DispatchView`] runs them all on a single event queue.

pub mod ambulance;
pub mod form;
pub mod renderer;
pub mod tracker;
pub mod view;

use crate::{
    core::{
        config::{DispatchConfig, IconSet, PopupTexts, RouteStyleConfig},
        geo::LatLngBounds,
    },
    data::route::RouteResult,
    layers::{
        marker::{Marker, MarkerRole},
        vector::{LineStyle, Polyline},
    },
    traits::MapSurface,
    Result,
};

/// Layers added by one render, as `(result index, layer id)` pairs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedRoutes {
    pub origin_marker: Option<String>,
    pub destination_markers: Vec<(usize, String)>,
    pub routes: Vec<(usize, String)>,
    pub fitted_bounds: Option<LatLngBounds>,
}

impl RenderedRoutes {
    pub fn is_empty(&self) -> bool {
        self.origin_marker.is_none() && self.destination_markers.is_empty() && self.routes.is_empty()
    }

    pub fn layer_ids(&self) -> impl Iterator<Item = &str> {
        self.origin_marker
            .iter()
            .map(String::as_str)
            .chain(self.destination_markers.iter().map(|(_, id)| id.as_str()))
            .chain(self.routes.iter().map(|(_, id)| id.as_str()))
    }
}

/// Draws a route result onto the map once: origin, destinations, routes,
/// then fits the view around origin and destinations.
///
/// Absent destinations and geometries are skipped, never reported.
#[derive(Debug, Clone)]
pub struct StaticRouteRenderer {
    icons: IconSet,
    popups: PopupTexts,
    style: RouteStyleConfig,
}

impl StaticRouteRenderer {
    pub fn new(icons: IconSet, popups: PopupTexts, style: RouteStyleConfig) -> Self {
        Self {
            icons,
            popups,
            style,
        }
    }

    pub fn from_config(config: &DispatchConfig) -> Self {
        Self::new(
            config.icons.clone(),
            config.popups.clone(),
            config.routes.clone(),
        )
    }

    pub fn render<S: MapSurface + ?Sized>(
        &self,
        result: &RouteResult,
        surface: &mut S,
    ) -> Result<RenderedRoutes> {
        let mut rendered = RenderedRoutes::default();
        let origin = match result.origin {
            Some(origin) if result.should_render() => origin,
            _ => {
                log::debug!("route result empty, nothing to render");
                return Ok(rendered);
            }
        };

        let id = surface.next_layer_id("origin");
        let marker = Marker::new(id.clone(), origin)
            .with_role(MarkerRole::Origin)
            .with_icon(self.icons.origin.clone())
            .with_popup(self.popups.origin.clone());
        surface.add_layer(Box::new(marker))?;
        rendered.origin_marker = Some(id);

        let mut fit_points = vec![origin];
        for (index, destination) in result.destinations.iter().enumerate() {
            let Some(position) = *destination else {
                log::debug!("destination {} absent, skipped", index);
                continue;
            };

            let (role, icon, popup) = if result.is_best(index) {
                (MarkerRole::BestDestination, &self.icons.best, &self.popups.best)
            } else {
                (MarkerRole::Destination, &self.icons.ordinary, &self.popups.ordinary)
            };

            let id = surface.next_layer_id("destination");
            let marker = Marker::new(id.clone(), position)
                .with_role(role)
                .with_icon(icon.clone())
                .with_popup(popup.clone());
            surface.add_layer(Box::new(marker))?;
            rendered.destination_markers.push((index, id));
            fit_points.push(position);
        }

        for (index, geometry) in result.geometries.iter().enumerate() {
            let Some(geometry) = geometry else {
                log::debug!("route geometry {} absent, skipped", index);
                continue;
            };

            let color = if result.is_best(index) {
                self.style.highlight
            } else {
                self.style.muted
            };

            let id = surface.next_layer_id("route");
            let line = Polyline::new(id.clone(), geometry.to_lat_lngs()).with_style(LineStyle {
                color,
                weight: self.style.weight,
                opacity: self.style.opacity,
                dash_pattern: Vec::new(),
            });
            surface.add_layer(Box::new(line))?;
            rendered.routes.push((index, id));
        }

        if let Some(bounds) = LatLngBounds::from_points(&fit_points) {
            surface.fit_bounds(&bounds)?;
            rendered.fitted_bounds = Some(bounds);
        }

        log::info!(
            "rendered {} destination(s) and {} route(s), best index {:?}",
            rendered.destination_markers.len(),
            rendered.routes.len(),
            result.best_index()
        );

        Ok(rendered)
    }
}

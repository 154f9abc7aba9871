use ambumap::prelude::*;

/// Integration tests for drawing a routing backend result on the dispatch map
#[cfg(test)]
mod dispatch_tests {
    use super::*;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// Backend output with the middle destination missing
    const PARTIAL_RESULT: &str = r#"{
        "origin": [24.8607, 67.0011],
        "destinations": [[24.87, 67.02], null, [24.90, 67.05]],
        "geometries": [
            { "type": "LineString", "coordinates": [[67.0011, 24.8607], [67.01, 24.86], [67.02, 24.87]] },
            null,
            { "type": "LineString", "coordinates": [[67.0011, 24.8607], [67.05, 24.90]] }
        ],
        "best_index": 2
    }"#;

    fn render(json: &str) -> (Map, RenderedRoutes) {
        let config = DispatchConfig::default();
        let mut map = Map::from_config(&config).unwrap();
        let result = RouteResult::from_json_str(json).unwrap();
        let rendered = StaticRouteRenderer::from_config(&config)
            .render(&result, &mut map)
            .unwrap();
        (map, rendered)
    }

    /// Absent destinations and geometries are skipped, not drawn
    #[tokio::test]
    async fn test_skip_policy() {
        init_logging();
        let (map, rendered) = render(PARTIAL_RESULT);

        let marker_indices: Vec<_> = rendered.destination_markers.iter().map(|(i, _)| *i).collect();
        let route_indices: Vec<_> = rendered.routes.iter().map(|(i, _)| *i).collect();
        assert_eq!(marker_indices, vec![0, 2]);
        assert_eq!(route_indices, vec![0, 2]);

        let destinations: Vec<_> = map
            .markers()
            .into_iter()
            .filter(|m| m.role().is_destination())
            .collect();
        assert_eq!(destinations.len(), 2);
        assert_eq!(map.polylines().len(), 2);
    }

    /// The best index gets the highlight color and the best icon
    #[tokio::test]
    async fn test_best_route_highlighting() {
        let config = DispatchConfig::default();
        let (map, rendered) = render(PARTIAL_RESULT);

        for (index, id) in &rendered.routes {
            let line = map
                .get_layer(id)
                .and_then(|layer| layer.as_any().downcast_ref::<Polyline>())
                .unwrap();
            let expected = if *index == 2 {
                config.routes.highlight
            } else {
                config.routes.muted
            };
            assert_eq!(line.style().color, expected);
            assert_eq!(line.style().weight, 5.0);
            assert_eq!(line.style().opacity, 0.7);
        }

        for (index, id) in &rendered.destination_markers {
            let marker = map.marker(id).unwrap();
            if *index == 2 {
                assert_eq!(marker.icon(), Some(&config.icons.best));
                assert_eq!(marker.popup_text(), Some("Best Hospital (Nearest)"));
            } else {
                assert_eq!(marker.icon(), Some(&config.icons.ordinary));
                assert_eq!(marker.popup_text(), Some("Hospital"));
            }
        }
    }

    /// Stored [lon, lat] pairs are drawn as (lat, lon)
    #[tokio::test]
    async fn test_coordinate_order_conversion() {
        let (map, _) = render(
            r#"{
                "origin": [24.86, 67.01],
                "destinations": [[24.87, 67.02]],
                "geometries": [{ "coordinates": [[67.01, 24.86], [67.02, 24.87]] }],
                "best_index": 0
            }"#,
        );

        let lines = map.polylines();
        assert_eq!(
            lines[0].points(),
            &[LatLng::new(24.86, 67.01), LatLng::new(24.87, 67.02)]
        );
    }

    /// An empty result leaves only the base map
    #[tokio::test]
    async fn test_no_op_on_empty_result() {
        let (map, rendered) = render(r#"{ "origin": null, "destinations": [], "geometries": [], "best_index": -1 }"#);

        assert!(rendered.is_empty());
        assert!(map.markers().is_empty());
        assert!(map.polylines().is_empty());
        assert_eq!(map.viewport().zoom, 12.0);
    }

    /// The view fits the origin and every present destination
    #[tokio::test]
    async fn test_fit_bounds_covers_origin_and_destinations() {
        let (mut map, rendered) = render(PARTIAL_RESULT);

        let bounds = rendered.fitted_bounds.unwrap();
        assert_eq!(bounds.south_west, LatLng::new(24.8607, 67.0011));
        assert_eq!(bounds.north_east, LatLng::new(24.90, 67.05));

        let visible = map.viewport().bounds();
        assert!(visible.contains(&LatLng::new(24.8607, 67.0011)));
        assert!(visible.contains(&LatLng::new(24.90, 67.05)));

        let kinds: Vec<_> = map.process_events().iter().map(|e| e.event_type()).collect();
        assert!(kinds.contains(&"boundsfitted"));
    }

    /// Backend statuses read the same way the request page shows them
    #[tokio::test]
    async fn test_route_summary() {
        let result = RouteResult::from_json_str(
            r#"{
                "origin": [24.8607, 67.0011],
                "destinations": [[24.87, 67.02], null, [24.90, 67.05]],
                "geometries": [null, null, { "coordinates": [[67.0011, 24.8607], [67.05, 24.90]] }],
                "best_index": 2,
                "hospitals": ["Jinnah Hospital", "Unknown Clinic", "Aga Khan"],
                "durations_s": [null, null, 754.0]
            }"#,
        )
        .unwrap();

        let statuses: Vec<_> = result.summary().iter().map(|row| row.status.to_string()).collect();
        assert_eq!(statuses, vec!["Routing failed", "Location not found", "12.6 min"]);
        assert_eq!(result.best().unwrap().hospital.as_deref(), Some("Aga Khan"));
    }

    /// A full view draws the result on mount and accepts a manual origin
    #[tokio::test]
    async fn test_view_renders_on_mount_and_click_sets_origin() {
        init_logging();
        let provider = ChannelGeolocation::new();
        let mut view = DispatchView::new(&DispatchConfig::default(), Box::new(provider.clone()))
            .unwrap()
            .with_route_result(RouteResult::from_json_str(PARTIAL_RESULT).unwrap());

        view.mount().unwrap();
        view.pump().unwrap();
        let rendered = view.rendered().unwrap();
        assert_eq!(rendered.routes.len(), 2);

        view.click_at(LatLng::new(24.88, 67.04));
        view.pump().unwrap();

        assert_eq!(view.form().origin_value(), Some("24.88,67.04"));
        assert_eq!(view.map().markers_with_role(MarkerRole::Ambulance).len(), 1);
        // The route origin marker is separate from the ambulance marker
        assert_eq!(view.map().markers_with_role(MarkerRole::Origin).len(), 1);
    }
}

use std::path::PathBuf;

use ambumap::prelude::*;
use anyhow::Context;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless ambulance dispatch map")]
struct Args {
    /// Route result JSON produced by the routing backend
    #[arg(long)]
    route: Option<PathBuf>,

    /// Dispatch configuration JSON (any subset of keys)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Recorded GPS track to replay, e.g. [{"fix": {"lat": 24.9, "lng": 67.1}}]
    #[arg(long)]
    track: Option<PathBuf>,

    /// Delay between replayed fixes
    #[arg(long, default_value_t = 250)]
    interval_ms: u64,

    /// Manual ambulance position as "lat,lng", applied after loading
    #[arg(long)]
    click: Option<LatLng>,

    /// Hospital names to add to the request form
    #[arg(long = "hospital")]
    hospitals: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => DispatchConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DispatchConfig::default(),
    };

    let interval = Duration::from_millis(args.interval_ms);
    let (provider, track_len) = match &args.track {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading track {}", path.display()))?;
            let replay = ReplayGeolocation::from_json_str(&json, interval)
                .with_context(|| format!("parsing track {}", path.display()))?;
            let len = replay.track().len();
            (Box::new(replay) as Box<dyn GeolocationProvider>, len)
        }
        // No GPS on a terminal
        None => (Box::new(UnsupportedGeolocation) as Box<dyn GeolocationProvider>, 0),
    };

    let mut view = DispatchView::new(&config, provider)?;
    if let Some(path) = &args.route {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading route result {}", path.display()))?;
        let result = RouteResult::from_json_str(&json)
            .with_context(|| format!("parsing route result {}", path.display()))?;
        print_summary(&result);
        view = view.with_route_result(result);
    }

    for hospital in &args.hospitals {
        let form = view.form_mut();
        let index = form.add_hospital_input();
        form.set_hospital(index, hospital.clone());
    }

    view.mount()?;
    view.pump()?;

    if let Some(position) = args.click {
        view.click_at(position);
        view.pump()?;
    }

    if track_len > 0 {
        let deadline = interval * (track_len as u32 + 1);
        let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(10)));
        let sleep = tokio::time::sleep(deadline);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let handled = view.pump()?;
                    if handled > 0 {
                        log::debug!("handled {} event(s)", handled);
                    }
                }
                _ = &mut sleep => break,
                _ = tokio::signal::ctrl_c() => {
                    log::info!("interrupted");
                    break;
                }
            }
        }
        view.pump()?;
    }

    view.unmount();
    print_state(&view);
    Ok(())
}

fn print_summary(result: &RouteResult) {
    for row in result.summary() {
        let name = row.hospital.as_deref().unwrap_or("(unnamed)");
        let marker = if row.is_best { " *" } else { "" };
        println!("{:>2}. {:<40} {}{}", row.index + 1, name, row.status, marker);
    }
}

fn print_state(view: &DispatchView) {
    let map = view.map();
    let viewport = map.viewport();
    println!("view: {} @ zoom {:.2}", viewport.center, viewport.zoom);

    for id in map.list_layers() {
        if let Some(layer) = map.get_layer(&id) {
            println!("{} [{}] {}", id, layer.layer_type(), layer.options());
        }
    }

    match view.ambulance_position() {
        Some(position) => println!("ambulance: {}", position),
        None => println!("ambulance: none"),
    }

    for (name, value) in view.form().submission() {
        println!("form {}={}", name, value);
    }
    for name in view.form().missing_required() {
        println!("form {} is required", name);
    }
}

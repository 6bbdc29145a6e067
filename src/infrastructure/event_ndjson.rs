use crate::usecase::event::AppEvent;
use serde_json::json;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

fn app_event_to_json(ev: &AppEvent) -> serde_json::Value {
    match ev {
        AppEvent::PhaseStarted { name } => json!({"type":"phase_started","name":name}),
        AppEvent::PhaseFinished { name } => json!({"type":"phase_finished","name":name}),
        AppEvent::MaskLoaded { key, cut_edges } => {
            json!({"type":"mask_loaded","key":key,"cut_edges":cut_edges})
        }
        AppEvent::MaskSampled {
            key,
            edges,
            cut_edges,
        } => {
            json!({"type":"mask_sampled","key":key,"edges":edges,"cut_edges":cut_edges})
        }
        AppEvent::MaskPersistFailed { key, error } => {
            json!({"type":"mask_persist_failed","key":key,"error":error})
        }
        AppEvent::ComponentsComputed {
            nodes,
            live_edges,
            components,
            giant_size,
            isolated_nodes,
        } => {
            json!({"type":"components_computed","nodes":nodes,"live_edges":live_edges,"components":components,"giant_size":giant_size,"isolated_nodes":isolated_nodes})
        }
        AppEvent::PathComputed {
            source,
            target,
            hops,
        } => {
            json!({"type":"path_computed","source":source,"target":target,"hops":hops})
        }
        AppEvent::WalkersDropped { starts } => {
            json!({"type":"walkers_dropped","starts":starts})
        }
        AppEvent::WalksSimulated { walkers, steps } => {
            json!({"type":"walks_simulated","walkers":walkers,"steps":steps})
        }
        AppEvent::Finished { stats } => json!({"type":"finished","stats":stats}),
    }
}

pub fn spawn_ndjson_printer(mut rx: mpsc::Receiver<AppEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(ev) = rx.recv().await {
            let line = app_event_to_json(&ev);

            // NDJSON to stdout.
            println!("{line}");
        }
    })
}

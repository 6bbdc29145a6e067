use crate::usecase::simulate::report::SimulationReport;
use anyhow::Result;
use tokio::fs;

pub async fn read_report_file(path: &str) -> Result<SimulationReport> {
    let raw = fs::read_to_string(path).await?;
    let report: SimulationReport = serde_json::from_str(&raw)?;
    Ok(report)
}

/// Pretty JSON, written next to the target and renamed into place.
pub async fn write_report_file(path: &str, report: &SimulationReport) -> Result<()> {
    let pretty = serde_json::to_string_pretty(report)?;
    let tmp = format!("{path}.tmp.{}", std::process::id());
    fs::write(&tmp, &pretty).await?;
    if let Err(e) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}

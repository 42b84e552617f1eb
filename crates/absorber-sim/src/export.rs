use absorber_core::AbsorptionCurve;
use anyhow::{ensure, Context, Result};
use std::path::Path;

/// Write one row per frequency bin. Singular bins are written as-is
/// (`NaN` / `inf`) so downstream tools can decide how to filter them.
pub fn write_curve_csv(path: &Path, curve: &AbsorptionCurve, diffuse: Option<&[f64]>) -> Result<()> {
    if let Some(diffuse) = diffuse {
        ensure!(
            diffuse.len() == curve.len(),
            "diffuse curve has {} bins, expected {}",
            diffuse.len(),
            curve.len()
        );
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    let mut header = vec![
        "frequency_hz",
        "zs_re",
        "zs_im",
        "reflection_re",
        "reflection_im",
        "alpha",
    ];
    if diffuse.is_some() {
        header.push("alpha_diffuse");
    }
    writer.write_record(&header)?;

    for i in 0..curve.len() {
        let zs = curve.surface_impedance[i];
        let vp = curve.reflection[i];
        let mut row = vec![
            curve.frequencies[i].to_string(),
            zs.re.to_string(),
            zs.im.to_string(),
            vp.re.to_string(),
            vp.im.to_string(),
            curve.absorption[i].to_string(),
        ];
        if let Some(diffuse) = diffuse {
            row.push(diffuse[i].to_string());
        }
        writer.write_record(&row)?;
    }

    writer.flush()?;
    tracing::info!(path = %path.display(), rows = curve.len(), "wrote CSV");
    Ok(())
}

//! End-to-end generation of a single cell.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use arcstr::ArcStr;
use log::info;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::JobConfig;
use crate::geometry::{ManhattanKernel, Region};
use crate::layout::{
    calculate_nanosheet_region, polygon_centers, Extents, LayoutGenerator, ShapeMap,
};
use crate::mos::Slot;
use crate::paths::out_layout;
use crate::placement::{Cell, Placer, PlacerKind};
use crate::tech::TechParams;
use crate::Result;

/// Everything produced for one cell, ready for an exporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutReport {
    pub name: String,
    pub tech: String,
    pub extents: Extents,
    /// Folded placement rows, top first.
    pub placement: Vec<Vec<Slot>>,
    pub shapes: ShapeMap,
    pub nanosheet: Region,
    /// Shape centers of every generated layer.
    pub centers: BTreeMap<ArcStr, Vec<Decimal>>,
}

/// Folds `cell` and derives all of its layer geometry.
pub fn generate_layout(
    name: &str,
    cell: &Cell,
    tech: &TechParams,
    height: usize,
    placer: PlacerKind,
) -> Result<LayoutReport> {
    let folded = placer.fold(cell, height)?;
    let extents = Extents::of_cell(&folded, tech)?;
    let shapes = LayoutGenerator::new(tech).generate_cell(&folded)?;
    let nanosheet = calculate_nanosheet_region(&ManhattanKernel, &shapes);
    let centers = shapes
        .layers()
        .map(|(layer, _)| (layer.clone(), polygon_centers(&shapes, layer)))
        .collect();

    info!(
        "generated {name}: {} x {} with {} nanosheet pieces",
        extents.width,
        extents.height,
        nanosheet.components().len()
    );

    Ok(LayoutReport {
        name: name.to_string(),
        tech: tech.name.clone(),
        extents,
        placement: folded.rows().map(|r| r.into_iter().cloned().collect()).collect(),
        shapes,
        nanosheet,
        centers,
    })
}

/// Runs a job and saves its report to `work_dir`, returning the report path.
pub fn execute_job(job: &JobConfig, work_dir: impl AsRef<Path>) -> anyhow::Result<PathBuf> {
    let tech = TechParams::load(&job.tech)?;
    let cell = Cell::load(&job.placement)?;
    let name = job.name();
    let report = generate_layout(&name, &cell, &tech, job.height, job.placer)?;

    let path = out_layout(work_dir, &name);
    std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::error::CellgenError;
    use crate::layout::rules::{NDIFF, PDIFF};
    use crate::mos::Transistor;
    use crate::placement::PlacementError;

    fn tech() -> TechParams {
        TechParams::builder()
            .name("ns3")
            .nanosheet_width(10)
            .np_spacing(4)
            .gate_extension(2)
            .gate_pitch(10)
            .row_height(60)
            .build()
            .unwrap()
    }

    fn nand2() -> Cell {
        Cell::new(
            vec![
                Some(Transistor::pmos("a", "vdd", "y")),
                Some(Transistor::pmos("b", "y", "vdd")),
            ],
            vec![
                Some(Transistor::nmos("a", "vss", "x")),
                Some(Transistor::nmos("b", "x", "y")),
            ],
        )
    }

    #[test]
    fn test_generate_single_level() -> Result<()> {
        let report = generate_layout("nand2", &nand2(), &tech(), 1, PlacerKind::Fold)?;
        assert_eq!(report.extents, Extents::new(20, 60));
        assert_eq!(report.placement.len(), 2);
        // Adjacent devices fuse into one strip per polarity.
        assert_eq!(report.nanosheet.components().len(), 2);
        assert_eq!(report.nanosheet.area(), 2 * 20 * 10);
        assert_eq!(report.centers[PDIFF], vec![dec!(5), dec!(15)]);
        assert_eq!(report.centers[NDIFF], vec![dec!(5), dec!(15)]);
        Ok(())
    }

    #[test]
    fn test_generate_folded() -> Result<()> {
        let report = generate_layout("nand2", &nand2(), &tech(), 2, PlacerKind::Fold)?;
        assert_eq!(report.extents, Extents::new(10, 120));
        assert_eq!(report.placement.len(), 4);
        assert_eq!(report.shapes.layer(PDIFF).len(), 2);
        assert_eq!(report.shapes.layer(NDIFF).len(), 2);
        // One device per sheet and no two sheets touch across levels.
        assert_eq!(report.nanosheet.components().len(), 4);
        Ok(())
    }

    #[test]
    fn test_generate_reports_placement_errors() {
        let err = generate_layout("nand2", &nand2(), &tech(), 0, PlacerKind::Fold).unwrap_err();
        assert!(matches!(
            err,
            CellgenError::Placement(PlacementError::InvalidHeight(0))
        ));
    }

    #[test]
    fn test_generate_cells_in_parallel() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TechParams>();
        assert_send_sync::<Cell>();
        assert_send_sync::<LayoutReport>();
        assert_send_sync::<ManhattanKernel>();

        let tech = tech();
        let cell = nand2();
        let reports = std::thread::scope(|s| {
            let handles = (1..=2)
                .map(|height| {
                    let (tech, cell) = (&tech, &cell);
                    s.spawn(move || generate_layout("nand2", cell, tech, height, PlacerKind::Fold))
                })
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|h| h.join().unwrap().unwrap())
                .collect::<Vec<_>>()
        });
        assert_eq!(reports[0].extents.height, 60);
        assert_eq!(reports[1].extents.height, 120);
    }

    #[test]
    fn test_execute_job() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("ns3.toml"), tech().to_toml()?)?;
        std::fs::write(
            dir.path().join("nand2.json"),
            serde_json::to_string(&nand2())?,
        )?;
        let job = JobConfig {
            name: None,
            tech: dir.path().join("ns3.toml"),
            placement: dir.path().join("nand2.json"),
            height: 2,
            placer: PlacerKind::Fold,
        };

        let path = execute_job(&job, dir.path())?;
        assert_eq!(path, dir.path().join("nand2.layout.json"));
        let report: LayoutReport = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(report.name, "nand2");
        assert_eq!(report.tech, "ns3");
        assert_eq!(report.extents, Extents::new(10, 120));
        Ok(())
    }

    #[test]
    fn test_sample_job() -> anyhow::Result<()> {
        let job = crate::config::parse_job_config(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/cellgen.toml"
        ))?;
        let dir = tempfile::tempdir()?;
        let path = execute_job(&job, dir.path())?;
        let report: LayoutReport = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        assert_eq!(report.name, "nand2");
        assert_eq!(report.extents, Extents::new(24, 120));
        Ok(())
    }
}

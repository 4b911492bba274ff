use std::sync::Arc;

use crate::color::ColorPolicy;
use crate::config::ViewerConfig;
use crate::data::cache::LoadCache;
use crate::data::filter::{clean, CleanerConfig};
use crate::data::group::{group_all, GroupedCurves};
use crate::data::loader::{load_file, SourceFile};
use crate::data::model::RecordSet;
use crate::error::Result;
use crate::render::{build_chart, rasterize, ChartModel, CurveSelection, RenderedChart};

// ---------------------------------------------------------------------------
// Pure pipeline
// ---------------------------------------------------------------------------

/// Clean and group a loaded record set.
pub fn prepare(records: &RecordSet, cleaner: &CleanerConfig) -> Result<GroupedCurves> {
    let cleaned = clean(records, cleaner)?;
    Ok(group_all(&cleaned)?)
}

/// Load, clean, group, colour and rasterize in one go. Depends only on the
/// file bytes (and name) and `config`.
pub fn render(file: &SourceFile, config: &ViewerConfig) -> Result<RenderedChart> {
    let records = load_file(file, config.sheet.as_deref())?;
    let curves = prepare(&records, &config.cleaner)?;
    let chart = build_chart(&curves, config.color_policy, config.selection);
    rasterize(&chart, &config.render)
}

// ---------------------------------------------------------------------------
// Interactive session
// ---------------------------------------------------------------------------

/// A successfully loaded and prepared file.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub records: Arc<RecordSet>,
    pub curves: GroupedCurves,
    pub chart: ChartModel,
}

/// Owns the configuration, the load cache and the current file. Uploads and
/// cleaning changes re-run the whole pipeline; selection and colour changes
/// only rebuild the chart model.
#[derive(Debug, Default)]
pub struct Session {
    config: ViewerConfig,
    cache: LoadCache,
    /// Last uploaded file, kept after a failed load so it can be retried with
    /// another sheet or cleaning setting.
    source: Option<SourceFile>,
    loaded: Option<Loaded>,
}

impl Session {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            cache: LoadCache::new(),
            source: None,
            loaded: None,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn source(&self) -> Option<&SourceFile> {
        self.source.as_ref()
    }

    pub fn loaded(&self) -> Option<&Loaded> {
        self.loaded.as_ref()
    }

    pub fn cache(&self) -> &LoadCache {
        &self.cache
    }

    /// Load and prepare `source`. On failure nothing stays loaded.
    pub fn open(&mut self, source: SourceFile) -> Result<()> {
        self.source = Some(source);
        self.reload()
    }

    /// Re-run the pipeline for the current file.
    pub fn reload(&mut self) -> Result<()> {
        self.loaded = None;
        let Some(source) = &self.source else {
            return Ok(());
        };
        let records = self.cache.get_or_load(source, self.config.sheet.as_deref())?;
        let curves = prepare(&records, &self.config.cleaner)?;
        let chart = build_chart(&curves, self.config.color_policy, self.config.selection);
        log::info!(
            "'{}': {} charge and {} discharge cycles",
            source.name,
            curves.charge.groups.len(),
            curves.discharge.groups.len()
        );
        self.loaded = Some(Loaded {
            records,
            curves,
            chart,
        });
        Ok(())
    }

    /// Change the worksheet and cleaning settings, then reload once.
    pub fn configure_loading(&mut self, sheet: Option<String>, cleaner: CleanerConfig) -> Result<()> {
        self.config.sheet = sheet;
        self.config.cleaner = cleaner;
        self.reload()
    }

    pub fn set_selection(&mut self, selection: CurveSelection) {
        self.config.selection = selection;
        self.rebuild_chart();
    }

    pub fn set_color_policy(&mut self, policy: ColorPolicy) {
        self.config.color_policy = policy;
        self.rebuild_chart();
    }

    fn rebuild_chart(&mut self) {
        let (policy, selection) = (self.config.color_policy, self.config.selection);
        if let Some(loaded) = &mut self.loaded {
            loaded.chart = build_chart(&loaded.curves, policy, selection);
        }
    }

    /// Rasterize the current chart; `None` when nothing is loaded.
    pub fn render(&self) -> Option<Result<RenderedChart>> {
        self.loaded
            .as_ref()
            .map(|l| rasterize(&l.chart, &self.config.render))
    }
}

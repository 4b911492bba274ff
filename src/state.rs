use std::path::Path;

use anyhow::Context;

use lis_curves::color::ColorPolicy;
use lis_curves::data::filter::CleanerConfig;
use lis_curves::data::loader::SourceFile;
use lis_curves::render::{encode_png, save_png, CurveSelection, RenderedChart};
use lis_curves::{Session, ViewerConfig, ViewerError};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which central view is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartView {
    /// The raster exactly as it is exported.
    #[default]
    Image,
    /// Pan/zoom view of the same curves.
    Interactive,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Configuration, load cache and the current file.
    pub session: Session,

    /// Raster of the current chart (None until a file is loaded).
    pub rendered: Option<RenderedChart>,

    /// Bumped whenever `rendered` changes so the texture can be refreshed.
    pub render_generation: u64,

    pub view: ChartView,

    /// Sheet-name text box; empty means first sheet.
    pub sheet_input: String,

    /// Edited CC start step, applied together with the sheet name.
    pub cc_start_step: i64,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl AppState {
    pub fn new(config: ViewerConfig) -> Self {
        let sheet_input = config.sheet.clone().unwrap_or_default();
        let cc_start_step = config.cleaner.cc_start_step;
        Self {
            session: Session::new(config),
            rendered: None,
            render_generation: 0,
            view: ChartView::default(),
            sheet_input,
            cc_start_step,
            status_message: None,
        }
    }

    /// Ingest a newly uploaded file and render it.
    pub fn open_file(&mut self, source: SourceFile) {
        let name = source.name.clone();
        let outcome = self.session.open(source);
        self.after_pipeline(outcome, &name);
    }

    pub fn set_selection(&mut self, selection: CurveSelection) {
        self.session.set_selection(selection);
        self.refresh_render();
    }

    pub fn set_color_policy(&mut self, policy: ColorPolicy) {
        self.session.set_color_policy(policy);
        self.refresh_render();
    }

    /// Apply the edited sheet name and CC start step, re-running the pipeline.
    pub fn apply_cleaning(&mut self) {
        let sheet = Some(self.sheet_input.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_owned);
        let cleaner = CleanerConfig {
            cc_start_step: self.cc_start_step,
            ..self.session.config().cleaner.clone()
        };
        let name = self.current_file_name().unwrap_or_default();
        let outcome = self.session.configure_loading(sheet, cleaner);
        self.after_pipeline(outcome, &name);
    }

    pub fn current_file_name(&self) -> Option<String> {
        self.session.source().map(|s| s.name.clone())
    }

    fn after_pipeline(&mut self, outcome: Result<(), ViewerError>, name: &str) {
        match outcome {
            Ok(()) => {
                self.status_message = None;
                self.refresh_render();
            }
            Err(e) => {
                log::error!("Failed to load '{name}': {e}");
                self.status_message = Some(format!("Error: {e}"));
                self.set_rendered(None);
            }
        }
    }

    /// Rasterize the current chart model.
    pub fn refresh_render(&mut self) {
        match self.session.render() {
            Some(Ok(rendered)) => self.set_rendered(Some(rendered)),
            Some(Err(e)) => {
                log::error!("Failed to render chart: {e}");
                self.status_message = Some(format!("Error: {e}"));
                self.set_rendered(None);
            }
            None => self.set_rendered(None),
        }
    }

    fn set_rendered(&mut self, rendered: Option<RenderedChart>) {
        self.rendered = rendered;
        self.render_generation += 1;
    }

    /// Encode the current chart and write it to `path`.
    pub fn export_to(&mut self, path: &Path) {
        let Some(rendered) = &self.rendered else {
            return;
        };
        match write_png(rendered, self.session.config().export.tight, path) {
            Ok(()) => {
                log::info!("Exported chart to {}", path.display());
                self.status_message = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to export chart: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Read `path` from disk and open it.
    pub fn open_path(&mut self, path: &Path) {
        match read_source(path) {
            Ok(source) => self.open_file(source),
            Err(e) => {
                log::error!("{e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

fn read_source(path: &Path) -> anyhow::Result<SourceFile> {
    SourceFile::read(path).with_context(|| format!("cannot read {}", path.display()))
}

fn write_png(rendered: &RenderedChart, tight: bool, path: &Path) -> anyhow::Result<()> {
    let bytes = encode_png(rendered, tight).context("encoding chart")?;
    save_png(path, &bytes).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

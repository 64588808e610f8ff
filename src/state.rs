use std::path::Path;

use crate::analysis::pipeline::{analyze, Analysis};
use crate::analysis::thermo::BuiltinIndices;
use crate::chart::ProfileVariable;
use crate::color::ColorMap;
use crate::data::columns::{infer_roles, ColumnRole, ColumnRoleMap};
use crate::data::table::RawTable;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded table (None until user loads a file).
    pub table: Option<RawTable>,

    /// File name of the loaded table.
    pub source_name: Option<String>,

    /// Current column roles: inferred on load, then user-editable.
    pub roles: ColumnRoleMap,

    /// Result of the last pipeline pass.
    pub analysis: Option<Analysis>,

    /// Colours of the temperature / dew-point lines.
    pub series_colors: ColorMap<ProfileVariable>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            table: None,
            source_name: None,
            roles: ColumnRoleMap::default(),
            analysis: None,
            series_colors: ColorMap::new(&ProfileVariable::ALL),
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded table: infer roles and analyse it. Anything from
    /// the previous upload is discarded.
    pub fn set_table(&mut self, table: RawTable, path: &Path) {
        self.roles = infer_roles(&table.column_names());
        self.source_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        self.table = Some(table);
        self.loading = false;
        self.rerun();
    }

    /// Override one column role and re-analyse.
    pub fn set_role(&mut self, role: ColumnRole, column: Option<String>) {
        if self.roles.get(role) == column.as_deref() {
            return;
        }
        self.roles.set(role, column);
        self.rerun();
    }

    /// Run the pipeline on the current table and roles.
    pub fn rerun(&mut self) {
        let Some(table) = &self.table else {
            self.analysis = None;
            return;
        };

        match analyze(table, &self.roles, &BuiltinIndices) {
            Ok(analysis) => {
                self.status_message = analysis.indices.as_ref().err().map(ToString::to_string);
                self.analysis = Some(analysis);
            }
            Err(e) => {
                self.status_message = Some(e.to_string());
                self.analysis = None;
            }
        }
    }
}

//! The interactive data grid of the "Tabla de Datos" tab.
//!
//! The whole dataset is shipped to the page in one go; paging, filtering and sorting all happen
//! in the browser.

use crate::model::{ColumnKind, Dataset, Value};
use serde::Serialize;
use serde_json::{Map, Value as Json};

/// The component id of the grid.
pub const GRID_ID: &str = "tabla_ifc";

/// Rows per page.
pub const PAGE_SIZE: usize = 10;

/// Where an interaction such as filtering or sorting is carried out. The grid only does it in
/// the browser.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    #[default]
    Native,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct GridColumn {
    pub name: String,
    pub id: String,
    /// Lets the browser sort numbers as numbers and dates as dates.
    #[serde(rename = "type")]
    pub kind: ColumnKind,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct TableStyle {
    #[serde(rename = "overflowX")]
    pub overflow_x: &'static str,
}

/// A paginated, sortable, filterable table over every column of the dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    id: &'static str,
    columns: Vec<GridColumn>,
    data: Vec<Map<String, Json>>,
    page_size: usize,
    filter_action: Action,
    sort_action: Action,
    style_table: TableStyle,
}

impl Grid {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let columns: Vec<GridColumn> = dataset
            .columns()
            .iter()
            .map(|series| GridColumn {
                name: series.name().to_string(),
                id: series.name().to_string(),
                kind: series.kind(),
            })
            .collect();

        let data = dataset
            .rows()
            .map(|row| {
                columns
                    .iter()
                    .zip(row)
                    .map(|(column, value)| (column.id.clone(), to_json(value)))
                    .collect()
            })
            .collect();

        Self {
            id: GRID_ID,
            columns,
            data,
            page_size: PAGE_SIZE,
            filter_action: Action::Native,
            sort_action: Action::Native,
            style_table: TableStyle { overflow_x: "auto" },
        }
    }

    pub fn id(&self) -> &str {
        self.id
    }

    pub fn columns(&self) -> &[GridColumn] {
        &self.columns
    }

    pub fn records(&self) -> &[Map<String, Json>] {
        &self.data
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The number of pages the browser will show.
    pub fn page_count(&self) -> usize {
        self.data.len().div_ceil(self.page_size).max(1)
    }
}

fn to_json(value: &Value) -> Json {
    serde_json::to_value(value).unwrap_or(Json::Null)
}

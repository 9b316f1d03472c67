//! The page structure: a title over three tabs.
//!
//! The layout is a tree of `Component`s serialized to JSON and drawn by the page script. Composing
//! it builds every static figure and the grid, and fills the country chart with its default
//! ordering so that the slot is never empty.

use crate::callbacks::{COUNTRY_FIGURE_ID, ORDER_INPUT_ID};
use crate::charts::{self, Figure};
use crate::controller::{Controller, SortOrder};
use crate::model::Dataset;
use crate::table::Grid;
use crate::Result;
use serde::Serialize;
use tracing::debug;

/// The browser tab title.
pub const PAGE_TITLE: &str = "Dashboard_IFC";

/// The banner above the tabs.
pub const HEADING: &str =
    "Tendencias y Evolución de los Proyectos de Servicios de Inversión del IFC";

pub const OVERVIEW_TAB: &str = "Resumen de Inversiones";
pub const COUNTRY_TAB: &str = "Análisis por País";
pub const TABLE_TAB: &str = "Tabla de Datos";

/// Half of the twelve-column grid.
const HALF_WIDTH: u8 = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadioOption {
    pub label: &'static str,
    pub value: SortOrder,
}

/// A node of the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "component", rename_all = "snake_case")]
pub enum Component {
    Container {
        fluid: bool,
        children: Vec<Component>,
    },
    Heading {
        text: &'static str,
        class_name: &'static str,
    },
    Tabs {
        children: Vec<Component>,
    },
    Tab {
        label: &'static str,
        children: Vec<Component>,
    },
    Row {
        children: Vec<Component>,
    },
    Col {
        md: u8,
        children: Vec<Component>,
    },
    Graph {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<&'static str>,
        figure: Figure,
    },
    Label {
        text: &'static str,
        class_name: &'static str,
    },
    RadioItems {
        id: &'static str,
        options: Vec<RadioOption>,
        value: SortOrder,
        inline: bool,
    },
    DataTable(Grid),
}

impl Component {
    pub fn children(&self) -> &[Component] {
        match self {
            Component::Container { children, .. }
            | Component::Tabs { children }
            | Component::Tab { children, .. }
            | Component::Row { children }
            | Component::Col { children, .. } => children,
            _ => &[],
        }
    }

    /// Depth-first search for the component with the given id.
    pub fn find(&self, id: &str) -> Option<&Component> {
        let own = match self {
            Component::Graph { id: Some(own), .. } | Component::RadioItems { id: own, .. } => {
                Some(*own)
            }
            Component::DataTable(grid) => Some(grid.id()),
            _ => None,
        };
        if own == Some(id) {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find(id))
    }
}

/// The composed page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    title: &'static str,
    root: Component,
}

impl Layout {
    /// Builds the whole page from the dataset.
    pub fn compose(dataset: &Dataset, controller: &Controller) -> Result<Self> {
        let [industry_box, category_pie, industry_bar, histogram, year_line, status_bar] =
            charts::overview(dataset)?;

        let overview = Component::Tab {
            label: OVERVIEW_TAB,
            children: vec![
                row(industry_box, category_pie),
                row(industry_bar, histogram),
                row(year_line, status_bar),
            ],
        };

        let default_order = SortOrder::default();
        let country = Component::Tab {
            label: COUNTRY_TAB,
            children: vec![
                Component::Label {
                    text: "Ordenar por:",
                    class_name: "mt-3",
                },
                Component::RadioItems {
                    id: ORDER_INPUT_ID,
                    options: SortOrder::all()
                        .into_iter()
                        .map(|value| RadioOption {
                            label: value.label(),
                            value,
                        })
                        .collect(),
                    value: default_order,
                    inline: true,
                },
                Component::Graph {
                    id: Some(COUNTRY_FIGURE_ID),
                    figure: controller.recompute(default_order)?,
                },
            ],
        };

        let table = Component::Tab {
            label: TABLE_TAB,
            children: vec![Component::DataTable(Grid::from_dataset(dataset))],
        };

        debug!("Composed the page layout");
        Ok(Self {
            title: PAGE_TITLE,
            root: Component::Container {
                fluid: true,
                children: vec![
                    Component::Heading {
                        text: HEADING,
                        class_name: "text-center mt-4 mb-4",
                    },
                    Component::Tabs {
                        children: vec![overview, country, table],
                    },
                ],
            },
        })
    }

    pub fn title(&self) -> &str {
        self.title
    }

    pub fn root(&self) -> &Component {
        &self.root
    }

    /// The three tabs, in display order.
    pub fn tabs(&self) -> &[Component] {
        self.root
            .children()
            .iter()
            .find(|c| matches!(c, Component::Tabs { .. }))
            .map(Component::children)
            .unwrap_or_default()
    }
}

fn row(left: Figure, right: Figure) -> Component {
    Component::Row {
        children: vec![col(left), col(right)],
    }
}

fn col(figure: Figure) -> Component {
    Component::Col {
        md: HALF_WIDTH,
        children: vec![Component::Graph { id: None, figure }],
    }
}

//! The country ranking chart of the "Análisis por País" tab.
//!
//! The chart is recomputed from the dataset every time the ordering control changes. Countries
//! are grouped in name order and then ranked with a stable sort on their summed investment, so
//! countries with equal sums at the tenth-place boundary are kept in name order.

use crate::charts::{
    Bar, Color, ColorBar, Data, Figure, Layout, Marker, Orientation, Title, Trace, VIRIDIS,
};
use crate::model::{Amount, Dataset, AMOUNT, COUNTRY};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// How many countries the ranking shows.
pub const TOP_N: usize = 10;

const AMOUNT_LABEL: &str = "Inversión Total (millones USD)";
const COUNTRY_LABEL: &str = "País";

/// The value of the ordering radio control.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// The ten countries with the largest total investment, largest first.
    #[default]
    Desc,
    /// The ten countries with the smallest total investment, smallest first.
    Asc,
}

serde_plain::derive_display_from_serialize!(SortOrder);
serde_plain::derive_fromstr_from_deserialize!(SortOrder);

impl SortOrder {
    pub fn title(&self) -> &'static str {
        match self {
            SortOrder::Desc => "Top 10 Países con Mayor Inversión Aprobada",
            SortOrder::Asc => "Top 10 Países con Menor Inversión Aprobada",
        }
    }

    /// The text shown next to the radio button.
    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Desc => "Top 10 (Mayor a Menor)",
            SortOrder::Asc => "Bottom 10 (Menor a Mayor)",
        }
    }

    pub fn all() -> [SortOrder; 2] {
        [SortOrder::Desc, SortOrder::Asc]
    }
}

/// Recomputes the country ranking chart on demand.
#[derive(Debug, Clone)]
pub struct Controller {
    dataset: Arc<Dataset>,
}

impl Controller {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// The at most `TOP_N` countries selected by `order`, in display order, with their summed
    /// investment.
    pub fn ranking(&self, order: SortOrder) -> Result<Vec<(String, Amount)>> {
        let mut sums: Vec<(String, Amount)> = self
            .dataset
            .sum_by_sorted(COUNTRY, AMOUNT)?
            .into_iter()
            .collect();
        match order {
            SortOrder::Desc => sums.sort_by(|a, b| b.1.cmp(&a.1)),
            SortOrder::Asc => sums.sort_by(|a, b| a.1.cmp(&b.1)),
        }
        sums.truncate(TOP_N);
        Ok(sums)
    }

    /// Builds the ranking bar chart for `order`, bars coloured by their value.
    pub fn recompute(&self, order: SortOrder) -> Result<Figure> {
        let ranking = self.ranking(order)?;
        debug!(
            "Recomputed the {order} country ranking over {} countries",
            ranking.len()
        );
        let (countries, amounts): (Vec<String>, Vec<Amount>) = ranking.into_iter().unzip();

        let bar = Bar {
            x: Data::Labels(countries),
            y: Data::Amounts(amounts.clone()),
            orientation: Orientation::Vertical,
            text: None,
            textposition: None,
            width: None,
            hovertext: None,
            marker: Marker {
                color: Some(Color::Scale(Data::Amounts(amounts))),
                colorscale: Some(VIRIDIS),
                showscale: Some(true),
                colorbar: Some(ColorBar {
                    title: Title::new(AMOUNT_LABEL),
                }),
                symbol: None,
            },
            showlegend: false,
        };

        let mut layout = Layout::titled(order.title(), COUNTRY_LABEL, AMOUNT_LABEL);
        // Keep the ranking order instead of letting plotly sort the categories.
        layout.xaxis.kind = Some("category");
        Ok(Figure::new(vec![Trace::Bar(bar)], layout))
    }
}

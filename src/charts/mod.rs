//! Builders for the static charts of the overview tab.
//!
//! Each builder reads the `Dataset`, computes the grouped view it needs and returns a `Figure`.
//! Builders never mutate the dataset and return the same figure for the same data. A column the
//! builder needs that is absent from the dataset is returned as an error.

mod figure;
mod histogram;

pub use figure::{
    Axis, Bar, BoxTrace, Color, ColorBar, Data, Figure, Layout, Line, Marker, Orientation, Pie,
    Scatter, Title, Trace, DEFAULT_COLOR, VIRIDIS,
};
pub use histogram::Histogram;

use crate::model::{
    Amount, Dataset, AMOUNT, ENVIRONMENTAL_CATEGORY, INDUSTRY, STATUS, YEAR,
};
use crate::Result;

/// The number of bins in the investment histogram.
pub const HISTOGRAM_BINS: usize = 30;

const AMOUNT_LABEL: &str = "Inversión IFC aprobada (millones USD)";
const INDUSTRY_LABEL: &str = "Industria";

/// Investment distribution per industry: one box per industry, in order of first appearance.
pub fn investment_by_industry_box(dataset: &Dataset) -> Result<Figure> {
    let industries = dataset.labels(INDUSTRY)?;
    let amounts = dataset.amounts(AMOUNT)?;

    let mut boxes: Vec<(String, Vec<Amount>)> = Vec::new();
    for (industry, amount) in industries.into_iter().zip(amounts) {
        let Some(industry) = industry else { continue };
        let ix = match boxes.iter().position(|(name, _)| *name == industry) {
            Some(ix) => ix,
            None => {
                boxes.push((industry, Vec::new()));
                boxes.len() - 1
            }
        };
        if let Some(amount) = amount {
            boxes[ix].1.push(amount);
        }
    }

    let data = boxes
        .into_iter()
        .map(|(name, values)| {
            Trace::Box(BoxTrace {
                name,
                x: None,
                y: Some(Data::Amounts(values)),
                boxpoints: None,
                jitter: None,
                fillcolor: None,
                line: None,
                hoveron: None,
                yaxis: None,
                marker: Marker::solid(DEFAULT_COLOR),
                showlegend: false,
            })
        })
        .collect();

    Ok(Figure::new(
        data,
        Layout::titled(
            "Distribución de inversión IFC por industria",
            INDUSTRY_LABEL,
            AMOUNT_LABEL,
        ),
    ))
}

/// Share of the total investment per environmental category.
pub fn investment_by_environmental_category_pie(dataset: &Dataset) -> Result<Figure> {
    let (labels, values) = dataset
        .sum_by(ENVIRONMENTAL_CATEGORY, AMOUNT)?
        .into_iter()
        .unzip();
    Ok(Figure::new(
        vec![Trace::Pie(Pie { labels, values })],
        Layout {
            title: Title::new("Distribución de inversiones por categoría ambiental"),
            ..Default::default()
        },
    ))
}

/// Number of projects per industry as horizontal bars, most frequent first.
pub fn projects_by_industry_bar(dataset: &Dataset) -> Result<Figure> {
    let (industries, counts): (Vec<String>, Vec<usize>) =
        dataset.value_counts(INDUSTRY)?.into_iter().unzip();
    let bar = Bar {
        x: Data::Counts(counts),
        y: Data::Labels(industries),
        orientation: Orientation::Horizontal,
        text: None,
        textposition: None,
        width: None,
        hovertext: None,
        marker: Marker::solid(DEFAULT_COLOR),
        showlegend: false,
    };
    Ok(Figure::new(
        vec![Trace::Bar(bar)],
        Layout::titled(
            "Cantidad de proyectos por industria",
            "Número de proyectos",
            INDUSTRY_LABEL,
        ),
    ))
}

/// Distribution of the approved investment over fixed-width bins, with a rug strip of the
/// individual values drawn above the bars.
pub fn investment_histogram(dataset: &Dataset) -> Result<Figure> {
    let values: Vec<Amount> = dataset.amounts(AMOUNT)?.into_iter().flatten().collect();
    let hist = Histogram::new(&values, HISTOGRAM_BINS);

    let bars = Trace::Bar(Bar {
        x: Data::Amounts(hist.centers()),
        y: Data::Counts(hist.counts().to_vec()),
        orientation: Orientation::Vertical,
        text: None,
        textposition: None,
        width: Some(hist.size()),
        hovertext: Some(hist.ranges()),
        marker: Marker::solid(DEFAULT_COLOR),
        showlegend: false,
    });

    let rug = Trace::Box(BoxTrace {
        name: "rug".to_string(),
        x: Some(Data::Amounts(values)),
        y: None,
        boxpoints: Some("all"),
        jitter: Some(0.0),
        fillcolor: Some("rgba(255,255,255,0)"),
        line: Some(Line {
            color: Some("rgba(255,255,255,0)"),
            width: None,
        }),
        hoveron: Some("points"),
        yaxis: Some("y2"),
        marker: Marker {
            symbol: Some("line-ns-open"),
            ..Marker::solid(DEFAULT_COLOR)
        },
        showlegend: false,
    });

    let mut layout = Layout::titled(
        "Distribución de la Inversión Total IFC Aprobada",
        "Inversión (millones USD)",
        "Frecuencia",
    );
    layout.yaxis.domain = Some([0.0, 0.84]);
    layout.yaxis2 = Some(Axis {
        domain: Some([0.86, 1.0]),
        anchor: Some("x"),
        showticklabels: Some(false),
        showgrid: Some(false),
        ..Default::default()
    });
    layout.bargap = Some(0.0);

    Ok(Figure::new(vec![bars, rug], layout))
}

/// Number of projects per approval year, oldest year first.
pub fn projects_per_year_line(dataset: &Dataset) -> Result<Figure> {
    let (years, counts) = dataset.count_by_year()?.into_iter().unzip();
    let line = Scatter {
        x: Data::Years(years),
        y: Data::Counts(counts),
        mode: "lines",
        line: Line {
            color: Some(DEFAULT_COLOR),
            width: None,
        },
        showlegend: false,
    };
    Ok(Figure::new(
        vec![Trace::Scatter(line)],
        Layout::titled("Proyectos Aprobados por Año", YEAR, "Proyectos"),
    ))
}

/// Total investment per project status, largest first, with the value printed on each bar.
pub fn investment_by_status_bar(dataset: &Dataset) -> Result<Figure> {
    let mut sums = dataset.sum_by(STATUS, AMOUNT)?;
    sums.sort_by(|a, b| b.1.cmp(&a.1));
    let text = sums.iter().map(|(_, amount)| amount.to_string()).collect();
    let (statuses, amounts) = sums.into_iter().unzip();

    let bar = Bar {
        x: Data::Labels(statuses),
        y: Data::Amounts(amounts),
        orientation: Orientation::Vertical,
        text: Some(text),
        textposition: Some("auto"),
        width: None,
        hovertext: None,
        marker: Marker::solid(DEFAULT_COLOR),
        showlegend: false,
    };
    Ok(Figure::new(
        vec![Trace::Bar(bar)],
        Layout::titled(
            "Estado del Proyecto vs. Monto Invertido",
            "Estado del Proyecto",
            "Monto Invertido (Millones USD)",
        ),
    ))
}

/// The six overview charts in display order: box, pie, industry bars, histogram, yearly line and
/// status bars.
pub fn overview(dataset: &Dataset) -> Result<[Figure; 6]> {
    Ok([
        investment_by_industry_box(dataset)?,
        investment_by_environmental_category_pie(dataset)?,
        projects_by_industry_bar(dataset)?,
        investment_histogram(dataset)?,
        projects_per_year_line(dataset)?,
        investment_by_status_bar(dataset)?,
    ])
}

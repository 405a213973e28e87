use comfy_table::{Attribute, Cell, CellAlignment, Table, modifiers, presets};

use crate::core::ReadingSet;

pub fn build_readings_table(readings: &ReadingSet) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();

    let mut header = vec![Cell::new("Date"), Cell::new("Hour")];
    header.extend(readings.metrics.iter().map(|metric| Cell::new(metric.header())));
    table.set_header(header);

    for reading in &readings.readings {
        let mut row = vec![
            Cell::new(reading.timestamp.format("%Y-%m-%d")).add_attribute(Attribute::Dim),
            Cell::new(reading.timestamp.format("%H:%M")),
        ];
        row.extend(readings.metrics.iter().map(|metric| match readings.value(reading, *metric) {
            Some(value) => Cell::new(value).set_alignment(CellAlignment::Right),
            None => Cell::new("-").set_alignment(CellAlignment::Right).add_attribute(Attribute::Dim),
        }));
        table.add_row(row);
    }

    let mut totals = vec![Cell::new("Total").add_attribute(Attribute::Bold), Cell::new("")];
    totals.extend(readings.totals().into_iter().map(|total| {
        Cell::new(total).set_alignment(CellAlignment::Right).add_attribute(Attribute::Bold)
    }));
    table.add_row(totals);

    table
}

use distinta_core::forecast::ForecastLine;
use distinta_core::parsing::{ColumnLocator, ExtractedBom};
use distinta_core::quote::{QuoteLine, QuoteStatus};

pub fn print_bom(bom: &ExtractedBom) {
    print!("{}", format_bom(bom));
}

pub fn print_forecast(lines: &[ForecastLine]) {
    print!("{}", format_forecast(lines));
}

pub fn print_quote(lines: &[QuoteLine]) {
    print!("{}", format_quote(lines));
}

pub fn format_bom(bom: &ExtractedBom) -> String {
    let mut out = format!("Strategy: {}\n", bom.strategy);
    match &bom.columns {
        Some(ColumnLocator::Pdf(cols)) => out.push_str(&format!(
            "Columns: code at x={:.1}, quantity at x={:.1} (tolerance {:.1})\n",
            cols.code_x, cols.quantity_x, cols.tolerance
        )),
        Some(ColumnLocator::Sheet(cols)) => {
            let origin = match cols.header_row {
                Some(row) => format!("header row {}", row + 1),
                None => "positional".to_string(),
            };
            out.push_str(&format!(
                "Columns: code in column {}, quantity in column {} ({origin})\n",
                cols.code_column + 1,
                cols.quantity_column + 1
            ));
        }
        None => {}
    }
    out.push('\n');

    let width = bom
        .lines
        .iter()
        .map(|l| l.component_code.len())
        .max()
        .unwrap_or(0)
        .max("Code".len());

    out.push_str(&format!("  {:<width$}  Quantity\n", "Code"));
    for line in &bom.lines {
        out.push_str(&format!("  {:<width$}  {}\n", line.component_code, line.quantity));
    }

    out.push_str(&format!(
        "\n{} line(s) from {} data row(s)\n",
        bom.lines.len(),
        bom.rows_scanned
    ));
    if !bom.skipped.is_empty() {
        out.push_str(&format!("{} row(s) skipped:\n", bom.skipped.len()));
        for skipped in &bom.skipped {
            out.push_str(&format!(
                "  row {}: {} ({})\n",
                skipped.row + 1,
                skipped.reason,
                skipped.text
            ));
        }
    }
    out
}

pub fn format_forecast(lines: &[ForecastLine]) -> String {
    if lines.is_empty() {
        return "No components required by this plan.\n".to_string();
    }

    let code_width = lines
        .iter()
        .map(|l| l.component_code.len())
        .max()
        .unwrap_or(0)
        .max("Code".len());
    let desc_width = lines
        .iter()
        .map(|l| l.description.chars().count())
        .max()
        .unwrap_or(0)
        .max("Description".len());

    let mut out = format!(
        "  {:<code_width$}  {:<desc_width$}  Total\n",
        "Code", "Description"
    );
    for line in lines {
        out.push_str(&format!(
            "  {:<code_width$}  {:<desc_width$}  {}\n",
            line.component_code, line.description, line.total_quantity
        ));
        for part in &line.breakdown {
            out.push_str(&format!(
                "      {} x {} per unit x {} = {}\n",
                part.product_name, part.quantity_per_unit, part.product_quantity, part.total_for_product
            ));
        }
    }
    out
}

pub fn format_quote(lines: &[QuoteLine]) -> String {
    let mut out = format!(
        "  {:<14} {:<10} {:<12} {:<30} {:<20} {:<16} {:>10}  Lead time\n",
        "Input", "SEKO", "LF WMS", "Description", "Supplier", "Part number", "Cost"
    );

    for line in lines {
        if line.status == QuoteStatus::NotFound {
            out.push_str(&format!("  {:<14} Non Trovato\n", line.input_code));
            continue;
        }

        let dash = "-".to_string();
        let (supplier, part_number, cost, lead_time) = match &line.supplier {
            Some(s) => (
                s.name.clone(),
                s.part_number.clone(),
                s.cost.to_string(),
                s.lead_time.clone(),
            ),
            None => ("Nessun fornitore".to_string(), dash.clone(), dash.clone(), dash),
        };
        out.push_str(&format!(
            "  {:<14} {:<10} {:<12} {:<30} {:<20} {:<16} {:>10}  {}\n",
            line.input_code,
            line.seko_code.as_deref().unwrap_or("-"),
            line.lf_wms_code.as_deref().unwrap_or("-"),
            line.description.as_deref().unwrap_or("-"),
            supplier,
            part_number,
            cost,
            lead_time
        ));
    }

    let found = lines.iter().filter(|l| l.status == QuoteStatus::Found).count();
    out.push_str(&format!(
        "\n{} line(s), {} not found\n",
        lines.len(),
        lines.len() - found
    ));
    out
}

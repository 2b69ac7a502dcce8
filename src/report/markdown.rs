use crate::report::ForecastReport;
use markdown_builder::Markdown;
use markdown_table::{Heading, HeadingAlignment, MarkdownTable};
use std::fs;

pub trait MarkdownReport {
    fn report_create(&self, path: &str) -> crate::model::Result<()>;
}

impl MarkdownReport for ForecastReport {
    fn report_create(&self, path: &str) -> crate::model::Result<()> {
        let mut doc = Markdown::new();

        doc.header1("Delivery forecast");
        doc.paragraph(self.generate_summary());

        let table = self.generate_table();
        if !table.is_empty() {
            doc.header2("Forecast table");
            doc.paragraph(forecast_table(&table));
        }

        fs::write(path, doc.render())
            .map_err(|error| format!("the report file `{path}` can't be written: {error}"))?;
        Ok(())
    }
}

fn forecast_table(rows: &[(u32, chrono::NaiveDate)]) -> String {
    let header = vec![
        Heading::new("Probability".to_string(), Some(HeadingAlignment::Center)),
        Heading::new("On or before".to_string(), Some(HeadingAlignment::Center)),
    ];
    let table = rows
        .iter()
        .map(|(probability, date)| {
            vec![
                format!("{probability}%"),
                date.format("%d %B, %Y").to_string(),
            ]
        })
        .collect::<Vec<_>>();

    let mut md_table = MarkdownTable::new(table);
    md_table.with_headings(header);
    md_table.as_markdown().unwrap()
}

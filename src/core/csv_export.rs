use crate::domain::model::{Column, CsvOptions, PriceRow};
use crate::utils::error::Result;
use std::io;

/// 寫出標題列與所有資料列
pub fn write_rows<W: io::Write>(writer: W, rows: &[PriceRow], options: &CsvOptions) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .quote(options.quote)
        .quote_style(options.quoting.quote_style())
        .from_writer(writer);

    csv_writer.write_record(options.columns.iter().map(Column::header))?;

    for row in rows {
        csv_writer.write_record(options.columns.iter().map(|column| row.field(*column)))?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// 先在記憶體中組好整份 CSV，寫檔時一次完成
pub fn to_csv_bytes(rows: &[PriceRow], options: &CsvOptions) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_rows(&mut buffer, rows, options)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Price, PriceFormat, Quoting};

    fn rows() -> Vec<PriceRow> {
        let format = PriceFormat::default();
        vec![
            PriceRow {
                address: "Main St 1".to_string(),
                price: Price::parse("250000", format),
                url: Some("https://example.com/1".to_string()),
            },
            PriceRow {
                address: "Side St 2, Utrecht".to_string(),
                price: None,
                url: None,
            },
        ]
    }

    fn render(options: &CsvOptions) -> String {
        String::from_utf8(to_csv_bytes(&rows(), options).unwrap()).unwrap()
    }

    #[test]
    fn test_default_options_quote_everything() {
        let output = render(&CsvOptions::default());
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], r#""address","price""#);
        assert_eq!(lines[1], r#""Main St 1","250000""#);
        assert_eq!(lines[2], r#""Side St 2, Utrecht","""#);
    }

    #[test]
    fn test_custom_delimiter_quoting_and_order() {
        let options = CsvOptions {
            delimiter: b';',
            quote: b'\'',
            quoting: Quoting::Necessary,
            columns: vec![Column::Price, Column::Address, Column::Url],
        };

        let output = render(&options);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "price;address;url");
        assert_eq!(lines[1], "250000;Main St 1;https://example.com/1");
        assert_eq!(lines[2], ";Side St 2, Utrecht;");
    }

    #[test]
    fn test_empty_rows_still_write_header() {
        let output = String::from_utf8(to_csv_bytes(&[], &CsvOptions::default()).unwrap()).unwrap();
        assert_eq!(output.lines().count(), 1);
    }
}

//! # Interactive Console
//!
//! Sequential prompts for the operator: the camera address and stream quality at
//! startup, and the product form when an unknown code is registered. Every
//! prompt blocks until a line is entered; there are no timeouts.
//!
//! [`Console`] works over any reader/writer pair so sessions can be scripted.

use std::io::{BufRead, Write};

use scan_scale::presets::QualityTier;
use tracing::debug;

use crate::config::normalize_address;
use crate::error::{ScanError, ScanResult};
use crate::store::{FIELD_BRAND, FIELD_CATEGORY, FIELD_NAME, ProductRecord};

/// Category menu, in option order.
pub const CATEGORIES: [(&str, &str); 5] = [
    ("1", "Alimentos"),
    ("2", "Bebidas"),
    ("3", "Limpeza"),
    ("4", "Higiene"),
    ("5", "Outros"),
];

/// Category stored when the option is not on the menu.
pub const FALLBACK_CATEGORY: &str = "Outros";

/// Category for a menu option. The option must match exactly; anything else,
/// padded input included, stores [`FALLBACK_CATEGORY`].
pub fn category_for(option: &str) -> &'static str {
    CATEGORIES
        .iter()
        .find(|(key, _)| *key == option)
        .map(|(_, name)| *name)
        .unwrap_or(FALLBACK_CATEGORY)
}

/// Source of product details for a code that is about to be registered.
pub trait ProductPrompt {
    /// Ask for the record to store under `code`.
    ///
    /// # Errors
    ///
    /// `ScanError::Input` when the operator input is closed.
    fn collect_product(&mut self, code: &str) -> ScanResult<ProductRecord>;
}

/// Line-oriented prompts over a reader/writer pair.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    /// Banner plus the camera address prompt, normalized to a stream URL.
    pub fn ask_address(&mut self) -> ScanResult<String> {
        self.say("=== BARCODE SCANNER WITH PHONE CAMERA ===")?;
        self.say("To use the phone camera, install the 'IP Webcam' app")?;
        self.say("Open the app, scroll to the bottom and tap 'Start server'")?;
        self.say("The app shows an address (example: http://192.168.1.100:8080)")?;
        let raw = self.ask("\nEnter the address shown in the IP Webcam app: ")?;
        let url = normalize_address(&raw);
        debug!(input = %raw, url = %url, "camera address");
        Ok(url)
    }

    /// Performance tier menu. Empty or unknown input selects the balanced tier.
    pub fn ask_quality(&mut self) -> ScanResult<QualityTier> {
        self.say("\nChoose the performance mode:")?;
        for (index, tier) in QualityTier::ALL.iter().enumerate() {
            self.say(&format!("{}. {}", index + 1, tier.label()))?;
        }
        let option = self.ask("Option (1-3) [2]: ")?;
        Ok(QualityTier::from_option(&option))
    }

    fn say(&mut self, line: &str) -> ScanResult<()> {
        writeln!(self.output, "{}", line).map_err(|e| ScanError::io("write console", e))
    }

    /// Print `prompt` and read one line without its line terminator.
    fn ask(&mut self, prompt: &str) -> ScanResult<String> {
        write!(self.output, "{}", prompt).map_err(|e| ScanError::io("write console", e))?;
        self.output
            .flush()
            .map_err(|e| ScanError::io("flush console", e))?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| ScanError::input(prompt.trim(), e.to_string()))?;
        if read == 0 {
            return Err(ScanError::input(prompt.trim(), "input closed"));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl<R: BufRead, W: Write> ProductPrompt for Console<R, W> {
    fn collect_product(&mut self, code: &str) -> ScanResult<ProductRecord> {
        self.say(&format!("\nAdding product with code {}:", code))?;
        let name = self.ask("Product name: ")?;
        let brand = self.ask("Brand: ")?;

        self.say("\nChoose the category:")?;
        for (key, category) in CATEGORIES {
            self.say(&format!("{}. {}", key, category))?;
        }
        let category = category_for(&self.ask("Option: ")?);

        let mut record = ProductRecord::new();
        record.insert(FIELD_NAME, name);
        record.insert(FIELD_BRAND, brand);
        record.insert(FIELD_CATEGORY, category);

        loop {
            let field = self.ask("\nAdd an extra field (leave blank to finish): ")?;
            if field.is_empty() {
                break;
            }
            let value = self.ask(&format!("Value for '{}': ", field))?;
            record.insert(field, value);
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn address_is_normalized() {
        let mut c = console("192.168.0.7:8080\n");
        assert_eq!(c.ask_address().unwrap(), "http://192.168.0.7:8080/video");

        let mut c = console("\n");
        assert_eq!(c.ask_address().unwrap(), "http://192.168.1.100:8080/video");
    }

    #[test]
    fn quality_menu_defaults_to_balanced() {
        assert_eq!(console("1\n").ask_quality().unwrap(), QualityTier::High);
        assert_eq!(console("3\n").ask_quality().unwrap(), QualityTier::Performance);
        assert_eq!(console("\n").ask_quality().unwrap(), QualityTier::Balanced);
        assert_eq!(console("7\n").ask_quality().unwrap(), QualityTier::Balanced);
    }

    #[test]
    fn product_form_builds_record_in_order() {
        let mut c = console("Café\nPilão\n2\npeso\n500g\n\n");
        let record = c.collect_product("7896089011234").unwrap();

        let fields: Vec<(&str, &str)> = record.iter().collect();
        assert_eq!(
            fields,
            [
                ("nome", "Café"),
                ("marca", "Pilão"),
                ("categoria", "Bebidas"),
                ("peso", "500g"),
            ]
        );

        let (_, output) = c.into_inner();
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Adding product with code 7896089011234"));
        assert!(text.contains("5. Outros"));
    }

    #[test]
    fn unlisted_category_falls_back() {
        let record = console("Test\nT\n9\n\n").collect_product("1").unwrap();
        assert_eq!(record.category(), Some("Outros"));
        assert_eq!(category_for("5"), "Outros");
    }

    #[test]
    fn padded_category_option_is_not_on_the_menu() {
        assert_eq!(category_for("3"), "Limpeza");
        assert_eq!(category_for(" 3 "), "Outros");
        assert_eq!(category_for("3 "), "Outros");

        let record = console("Sabao\nYpe\n 3\n\n").collect_product("1").unwrap();
        assert_eq!(record.category(), Some("Outros"));
    }

    #[test]
    fn closed_input_is_an_error() {
        let err = console("Test\n").collect_product("1").unwrap_err();
        assert!(matches!(err, ScanError::Input { .. }));
    }

    #[test]
    fn windows_line_endings_are_stripped() {
        let record = console("Test\r\nT\r\n1\r\n\r\n").collect_product("1").unwrap();
        assert_eq!(record.name(), Some("Test"));
        assert_eq!(record.category(), Some("Alimentos"));
    }
}

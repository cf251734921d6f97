use distinta_core::error::BomError;
use serde::Serialize;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), BomError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

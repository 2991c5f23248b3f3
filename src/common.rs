use std::fs::File;
use std::io::Write;
use std::path::Path;

pub fn write_string_to_file(filename: &Path, content: &str) -> std::io::Result<()> {
    let mut file = File::create(filename)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

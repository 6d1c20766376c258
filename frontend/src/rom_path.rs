//! ROM loading: a plain ROM file, or a single-entry ZIP archive some DMG
//! ROM distributions ship as.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Loads the cartridge image bytes from `path`. A `.zip` extension is
/// unpacked and its first non-directory entry used; anything else is read
/// as a raw ROM image.
pub fn load_rom_bytes(path: &Path) -> std::io::Result<Vec<u8>> {
    if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
    {
        return load_from_zip(path);
    }
    std::fs::read(path)
}

fn load_from_zip(path: &Path) -> std::io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut archive = zip::ZipArchive::new(reader).map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidData, format!("invalid ZIP: {e}"))
    })?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("ZIP entry error: {e}"),
            )
        })?;
        if entry.is_dir() {
            continue;
        }
        let mut data = Vec::with_capacity(entry.size() as usize);
        std::io::Read::read_to_end(&mut entry, &mut data)?;
        return Ok(data);
    }

    Err(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        format!("no ROM entry found in {}", path.display()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_a_plain_rom_file() {
        let dir = std::env::temp_dir().join("dmg_rompath_test_plain");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("game.gb");
        std::fs::write(&path, [0xAA; 32]).unwrap();

        assert_eq!(load_rom_bytes(&path).unwrap(), vec![0xAAu8; 32]);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn unpacks_a_single_entry_zip() {
        let dir = std::env::temp_dir().join("dmg_rompath_test_zip");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let zip_path = dir.join("game.zip");

        let file = File::create(&zip_path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        zip.start_file("game.gb", options).unwrap();
        zip.write_all(&[0xBB; 16]).unwrap();
        zip.finish().unwrap();

        assert_eq!(load_rom_bytes(&zip_path).unwrap(), vec![0xBBu8; 16]);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}

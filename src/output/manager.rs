// Tue Jan 13 2026 - Alex

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Destinations of one run: the header stream and the optional test program.
pub struct OutputManager {
    header: Box<dyn Write>,
    test: Option<Box<dyn Write>>,
}

impl OutputManager {
    /// Header to stdout, no test program.
    pub fn stdout() -> Self {
        Self {
            header: Box::new(BufWriter::new(io::stdout())),
            test: None,
        }
    }

    pub fn from_writers(header: Box<dyn Write>, test: Option<Box<dyn Write>>) -> Self {
        Self { header, test }
    }

    /// Creates (truncating) the given files. A missing header path means stdout.
    pub fn open(header: Option<&Path>, test: Option<&Path>) -> io::Result<Self> {
        let header: Box<dyn Write> = match header {
            Some(path) => Box::new(BufWriter::new(File::create(path)?)),
            None => Box::new(BufWriter::new(io::stdout())),
        };
        let test = match test {
            Some(path) => Some(Box::new(BufWriter::new(File::create(path)?)) as Box<dyn Write>),
            None => None,
        };
        Ok(Self { header, test })
    }

    pub fn header(&mut self) -> &mut dyn Write {
        self.header.as_mut()
    }

    pub fn test(&mut self) -> Option<&mut dyn Write> {
        match self.test.as_mut() {
            Some(writer) => Some(writer.as_mut()),
            None => None,
        }
    }

    pub fn has_test(&self) -> bool {
        self.test.is_some()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.header.flush()?;
        if let Some(test) = self.test.as_mut() {
            test.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_files() {
        let dir = std::env::temp_dir().join(format!("header-reconstructor-output-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let header = dir.join("out.h");
        let test = dir.join("test.c");

        let mut manager = OutputManager::open(Some(&header), Some(&test)).unwrap();
        assert!(manager.has_test());
        manager.header().write_all(b"struct _FOO;\n").unwrap();
        manager.test().unwrap().write_all(b"int main() {}\n").unwrap();
        manager.flush().unwrap();

        assert_eq!(std::fs::read_to_string(&header).unwrap(), "struct _FOO;\n");
        assert!(test.is_file());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}

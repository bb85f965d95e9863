//! YAML document emitter
//!
//! One `emit` call produces one YAML document on the output stream, in
//! call order, with no buffering across calls. Each document is preceded
//! by a `---` marker so the stream parses as multi-document YAML.

use std::io::Write;

use crate::error::{RunError, RunResult};
use crate::manifest::TypedObject;

/// Serializes typed-object records to an output stream
pub struct Emitter<W> {
    out: W,
    emitted: usize,
}

impl<W: Write> Emitter<W> {
    /// Create an emitter writing to `out`
    pub fn new(out: W) -> Self {
        Self { out, emitted: 0 }
    }

    /// Serialize one record as a YAML document and flush it
    pub fn emit(&mut self, object: &TypedObject) -> RunResult<()> {
        let doc = serde_yaml::to_string(object)?;
        self.write(b"---\n")?;
        self.write(doc.as_bytes())?;
        self.out.flush().map_err(|e| RunError::Io(e.to_string()))?;
        self.emitted += 1;
        tracing::debug!(kind = %object.kind, emitted = self.emitted, "emitted document");
        Ok(())
    }

    /// Number of documents emitted so far
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Consume the emitter and return the underlying stream
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, bytes: &[u8]) -> RunResult<()> {
        self.out
            .write_all(bytes)
            .map_err(|e| RunError::Io(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::DocValue;

    #[test]
    fn emits_one_document_per_call_in_order() {
        let mut emitter = Emitter::new(Vec::new());

        let mut first = TypedObject::new("v1", "Pod");
        first.metadata.insert("name".to_string(), DocValue::string("a"));
        emitter.emit(&first).unwrap();

        let second = TypedObject::new("v1", "Service");
        emitter.emit(&second).unwrap();

        assert_eq!(emitter.emitted(), 2);
        let out = String::from_utf8(emitter.into_inner()).unwrap();
        assert_eq!(
            out,
            "---\napiVersion: v1\nkind: Pod\nmetadata:\n  name: a\nspec: {}\n\
             ---\napiVersion: v1\nkind: Service\nmetadata: {}\nspec: {}\n"
        );
    }

    #[test]
    fn write_failures_surface_as_errors() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "sink closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut emitter = Emitter::new(Broken);
        let err = emitter.emit(&TypedObject::new("v1", "Pod")).unwrap_err();
        assert!(matches!(err, RunError::Io(_)));
        assert_eq!(emitter.emitted(), 0);
    }
}

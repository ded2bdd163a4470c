// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Error types for `HllMap` operations.

use std::fmt;

/// ErrorKind is all kinds of Error this crate returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Caller passed a key of the wrong length, or a `k` that is not a
    /// positive power of two. The map is unchanged.
    BadInput,
    /// `resize` could not allocate the larger backing arrays. The map
    /// keeps its pre-resize arrays and remains usable.
    OutOfMemory,
    /// A probe completed a full cycle without finding the key or an empty
    /// slot. The load-factor invariant should have prevented this; treat
    /// the map as poisoned.
    InvariantViolated,
}

impl ErrorKind {
    /// Convert this error kind instance into a static str.
    pub const fn into_static(self) -> &'static str {
        match self {
            ErrorKind::BadInput => "BadInput",
            ErrorKind::OutOfMemory => "OutOfMemory",
            ErrorKind::InvariantViolated => "InvariantViolated",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.into_static())
    }
}

/// Error is the error struct returned by all `HllMap` functions.
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: Vec<(&'static str, String)>,
    source: Option<anyhow::Error>,
}

impl Error {
    /// Create a new Error with error kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: Vec::default(),
            source: None,
        }
    }

    /// Add more context to the error.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Set the source for this error.
    ///
    /// # Panics
    ///
    /// Panics if the source has already been set.
    pub fn set_source(mut self, src: impl Into<anyhow::Error>) -> Self {
        assert!(self.source.is_none(), "the source error has been set");
        self.source = Some(src.into());
        self
    }

    /// Return the error's kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return the error's message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

// Convenience constructors used throughout the crate.
impl Error {
    pub(crate) fn bad_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadInput, msg)
    }

    pub(crate) fn key_length_mismatch(expected: usize, actual: usize) -> Self {
        Self::bad_input(format!(
            "key length mismatch: expected {expected} bytes, got {actual}"
        ))
        .with_context("expected_len", expected)
        .with_context("actual_len", actual)
    }

    pub(crate) fn out_of_memory(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::OutOfMemory, msg)
    }

    pub(crate) fn invariant_violated(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvariantViolated, msg)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            let mut de = f.debug_struct("Error");
            de.field("kind", &self.kind);
            de.field("message", &self.message);
            de.field("context", &self.context);
            de.field("source", &self.source);
            return de.finish();
        }

        write!(f, "{}", self.kind)?;
        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }
        writeln!(f)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "Context:")?;
            for (k, v) in self.context.iter() {
                writeln!(f, "   {k}: {v}")?;
            }
        }

        if let Some(source) = &self.source {
            writeln!(f)?;
            writeln!(f, "Source:")?;
            writeln!(f, "   {source:#}")?;
        }

        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if !self.context.is_empty() {
            write!(f, ", context: {{ ")?;
            write!(
                f,
                "{}",
                self.context
                    .iter()
                    .map(|(k, v)| format!("{k}: {v}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )?;
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        if let Some(source) = &self.source {
            write!(f, ", source: {source}")?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|v| v.as_ref())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let err = Error::bad_input("key too short");
        assert_eq!(format!("{err}"), "BadInput => key too short");
    }

    #[test]
    fn key_length_mismatch_carries_context() {
        let err = Error::key_length_mismatch(4, 3);
        assert_eq!(err.kind(), ErrorKind::BadInput);
        let rendered = format!("{err}");
        assert!(rendered.contains("expected_len: 4"));
        assert!(rendered.contains("actual_len: 3"));
    }

    #[test]
    #[should_panic(expected = "the source error has been set")]
    fn set_source_twice_panics() {
        let err = Error::out_of_memory("resize failed").set_source(std::io::Error::other("oom"));
        let _ = err.set_source(std::io::Error::other("oom again"));
    }
}

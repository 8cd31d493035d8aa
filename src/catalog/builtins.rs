// src/catalog/builtins.rs
//! Declarations of well-known interfaces outside the loaded package.
//!
//! Interfaces from the standard library are commonly embedded, so their
//! method sets are kept here as Go source and parsed on first use.

use std::sync::OnceLock;

use super::Package;

const UNIVERSE: &str = r#"package builtin

type error interface {
	Error() string
}
"#;

const FMT: &str = r#"package fmt

type Stringer interface {
	String() string
}

type GoStringer interface {
	GoString() string
}
"#;

const IO: &str = r#"package io

type Reader interface {
	Read(p []byte) (n int, err error)
}

type Writer interface {
	Write(p []byte) (n int, err error)
}

type Closer interface {
	Close() error
}

type Seeker interface {
	Seek(offset int64, whence int) (int64, error)
}

type ReadWriter interface {
	Reader
	Writer
}

type ReadCloser interface {
	Reader
	Closer
}

type WriteCloser interface {
	Writer
	Closer
}

type ReadWriteCloser interface {
	Reader
	Writer
	Closer
}

type ReadSeeker interface {
	Reader
	Seeker
}

type ReadSeekCloser interface {
	Reader
	Seeker
	Closer
}

type WriteSeeker interface {
	Writer
	Seeker
}

type ReadWriteSeeker interface {
	Reader
	Writer
	Seeker
}

type ReaderFrom interface {
	ReadFrom(r Reader) (n int64, err error)
}

type WriterTo interface {
	WriteTo(w Writer) (n int64, err error)
}

type ReaderAt interface {
	ReadAt(p []byte, off int64) (n int, err error)
}

type WriterAt interface {
	WriteAt(p []byte, off int64) (n int, err error)
}

type ByteReader interface {
	ReadByte() (byte, error)
}

type ByteScanner interface {
	ByteReader
	UnreadByte() error
}

type ByteWriter interface {
	WriteByte(c byte) error
}

type RuneReader interface {
	ReadRune() (r rune, size int, err error)
}

type RuneScanner interface {
	RuneReader
	UnreadRune() error
}

type StringWriter interface {
	WriteString(s string) (n int, err error)
}
"#;

const SORT: &str = r#"package sort

type Interface interface {
	Len() int
	Less(i, j int) bool
	Swap(i, j int)
}
"#;

const CONTEXT: &str = r#"package context

import "time"

type Context interface {
	Deadline() (deadline time.Time, ok bool)
	Done() <-chan struct{}
	Err() error
	Value(key any) any
}
"#;

/// Import paths with built-in declarations
pub const PATHS: &[&str] = &["context", "fmt", "io", "sort"];

/// The universe scope, which declares `error`
pub fn universe() -> &'static Package {
    static UNIVERSE_PKG: OnceLock<Package> = OnceLock::new();
    UNIVERSE_PKG.get_or_init(|| parse("universe.go", UNIVERSE))
}

/// Built-in declarations for the package at `path`, if there are any.
pub fn package(path: &str) -> Option<&'static Package> {
    static CONTEXT_PKG: OnceLock<Package> = OnceLock::new();
    static FMT_PKG: OnceLock<Package> = OnceLock::new();
    static IO_PKG: OnceLock<Package> = OnceLock::new();
    static SORT_PKG: OnceLock<Package> = OnceLock::new();

    let package = match path {
        "context" => CONTEXT_PKG.get_or_init(|| parse("context.go", CONTEXT)),
        "fmt" => FMT_PKG.get_or_init(|| parse("fmt.go", FMT)),
        "io" => IO_PKG.get_or_init(|| parse("io.go", IO)),
        "sort" => SORT_PKG.get_or_init(|| parse("sort.go", SORT)),
        _ => return None,
    };
    Some(package)
}

fn parse(name: &str, source: &str) -> Package {
    Package::from_sources([(name, source)]).expect("built-in declarations parse")
}

/// Predeclared type names other than `error`
pub fn is_predeclared_type(name: &str) -> bool {
    matches!(
        name,
        "any"
            | "bool"
            | "byte"
            | "comparable"
            | "complex64"
            | "complex128"
            | "float32"
            | "float64"
            | "int"
            | "int8"
            | "int16"
            | "int32"
            | "int64"
            | "rune"
            | "string"
            | "uint"
            | "uint8"
            | "uint16"
            | "uint32"
            | "uint64"
            | "uintptr"
    )
}

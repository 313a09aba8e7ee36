//! Error reporting shared by the `webpinspect` crates.
//!
//! Parsers return a [`Report`], which pairs the underlying error with the [`Attachment`]s recording what was being
//! parsed, and where in the parser, when the error occurred. Whether attachments are kept at all is decided per error
//! type by [`ReportableError::Stack`].

use std::any::type_name;
use std::fmt;
use std::fmt::{Debug, Display};
use std::panic::Location;
use std::result::Result as StdResult;

use derive_more::Display;

//
// public types
//

/// An error `E` together with the parser context it was raised in.
///
/// [`Display`] prints only the underlying error, while [`Debug`] also prints the location that raised it and every
/// [`Attachment`], innermost first. Use [`get_ref`](Self::get_ref) or [`into_inner`](Self::into_inner) to match on the
/// error, and [`attachments`](Self::attachments) to walk the context.
#[derive(thiserror::Error)]
#[error("{error}")]
pub struct Report<E: ReportableError> {
    #[source]
    error: E,
    stack: E::Stack,
}

/// A message pushed onto a [`Report`], with the source location that pushed it.
#[derive(Display)]
#[display(fmt = "{message} at {location}")]
pub struct Attachment {
    message: Box<dyn Display + Send + Sync + 'static>,
    location: &'static Location<'static>,
}

/// An attachment naming the type whose parsing failed.
#[derive(Clone, Copy, Debug, Display)]
#[display(fmt = "while parsing value of type `{}`", _0)]
pub struct WhileParsingType(&'static str);

/// [`Result`](StdResult) with the error wrapped in a [`Report`].
pub type Result<T, E> = StdResult<T, Report<E>>;

/// Extension methods for adding context to the [`Report`] in a [`Result`].
pub trait ResultExt: Sized {
    /// Push `printable` onto the report, if this is an `Err`.
    #[track_caller]
    fn attach_printable<P: Display + Send + Sync + 'static>(self, printable: P) -> Self;

    /// Push a [`WhileParsingType`] naming the `Ok` type onto the report, if this is an `Err`.
    #[track_caller]
    fn while_parsing_type(self) -> Self;
}

/// Storage for the context of a [`Report`].
pub trait ReportableErrorStack {
    /// Create an empty stack, recording the caller as the origin of the error.
    #[track_caller]
    fn new() -> Self;

    /// Push `printable`, recording the caller as its location.
    #[track_caller]
    fn attach_printable<P: Display + Send + Sync + 'static>(self, printable: P) -> Self;

    /// The location the error was raised at, if recorded.
    fn origin(&self) -> Option<&'static Location<'static>>;

    /// The attachments pushed so far, innermost first.
    fn attachments(&self) -> &[Attachment];
}

/// A stack recording the origin of the error and every attachment.
pub struct ReportStack {
    origin: &'static Location<'static>,
    attachments: Vec<Attachment>,
}

/// A stack which discards everything pushed onto it.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullReportStack;

/// An error type which can be wrapped in a [`Report`].
pub trait ReportableError: Display {
    /// Where this error's context is kept.
    type Stack: ReportableErrorStack;
}

//
// Report impls
//

impl<E: ReportableError> Report<E> {
    /// The underlying error.
    pub fn get_ref(&self) -> &E {
        &self.error
    }

    /// Discard the context, returning the underlying error.
    pub fn into_inner(self) -> E {
        self.error
    }

    /// The location the error was raised at, if `E` keeps context.
    pub fn origin(&self) -> Option<&'static Location<'static>> {
        self.stack.origin()
    }

    /// The attachments pushed onto this report, innermost first. Empty if `E` discards context.
    pub fn attachments(&self) -> &[Attachment] {
        self.stack.attachments()
    }

    /// Push `message` onto the report.
    #[track_caller]
    pub fn attach_printable<P: Display + Send + Sync + 'static>(self, message: P) -> Self {
        let Self { error, stack } = self;
        Self { error, stack: stack.attach_printable(message) }
    }
}

impl<E: ReportableError> From<E> for Report<E> {
    #[track_caller]
    fn from(error: E) -> Self {
        Self { error, stack: E::Stack::new() }
    }
}

impl<E: ReportableError> Debug for Report<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.error, f)?;
        if let Some(origin) = self.origin() {
            write!(f, " at {origin}")?;
        }
        for attachment in self.attachments() {
            write!(f, "\n - {attachment}")?;
        }
        Ok(())
    }
}

//
// Attachment impls
//

impl Attachment {
    /// The attached message.
    pub fn message(&self) -> &(dyn Display + Send + Sync) {
        &*self.message
    }

    /// The source location that pushed this attachment.
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }
}

impl Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

//
// WhileParsingType impls
//

impl WhileParsingType {
    /// An attachment naming `T`.
    pub fn new<T: ?Sized>() -> Self {
        Self(type_name::<T>())
    }
}

//
// ReportStack impls
//

impl ReportableErrorStack for ReportStack {
    #[track_caller]
    fn new() -> Self {
        Self { origin: Location::caller(), attachments: Vec::new() }
    }

    #[track_caller]
    fn attach_printable<P: Display + Send + Sync + 'static>(mut self, printable: P) -> Self {
        self.attachments.push(Attachment { message: Box::new(printable), location: Location::caller() });
        self
    }

    fn origin(&self) -> Option<&'static Location<'static>> {
        Some(self.origin)
    }

    fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }
}

//
// NullReportStack impls
//

impl ReportableErrorStack for NullReportStack {
    fn new() -> Self {
        Self
    }

    fn attach_printable<P: Display + Send + Sync + 'static>(self, _printable: P) -> Self {
        Self
    }

    fn origin(&self) -> Option<&'static Location<'static>> {
        None
    }

    fn attachments(&self) -> &[Attachment] {
        &[]
    }
}

//
// ResultExt impls
//

impl<T, E: ReportableError> ResultExt for Result<T, E> {
    #[track_caller]
    fn attach_printable<P: Display + Send + Sync + 'static>(self, printable: P) -> Self {
        match self {
            Ok(value) => Ok(value),
            Err(report) => Err(report.attach_printable(printable)),
        }
    }

    #[track_caller]
    fn while_parsing_type(self) -> Self {
        self.attach_printable(WhileParsingType::new::<T>())
    }
}

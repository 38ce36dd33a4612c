use crate::vector::{ScreenPoint, WorldPoint};
use slint::SharedString;
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(SharedString);

        impl $name {
            pub fn new(id: impl Into<SharedString>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(SharedString::from(id))
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(SharedString::from(id))
            }
        }

        impl From<SharedString> for $name {
            fn from(id: SharedString) -> Self {
                Self(id)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:?}", self.as_str())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        #[cfg(feature = "serde")]
        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                Ok(Self::from(s))
            }
        }
    };
}

string_id!(
    /// Caller-assigned node identifier, unique per canvas.
    NodeId
);

string_id!(
    /// Caller-assigned handle identifier, unique per node.
    HandleId
);

/// Identifies one connection point: a handle on a node.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandleRef {
    pub node_id: NodeId,
    pub handle_id: HandleId,
}

impl HandleRef {
    pub fn new(node_id: impl Into<NodeId>, handle_id: impl Into<HandleId>) -> Self {
        Self {
            node_id: node_id.into(),
            handle_id: handle_id.into(),
        }
    }
}

impl fmt::Display for HandleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.node_id, self.handle_id)
    }
}

/// One end of an [`Edge`].
///
/// A handle endpoint follows the handle for as long as it is registered. The
/// point variants are fixed positions, used while a link is being dragged and
/// has nothing to attach to yet.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Endpoint {
    Handle(HandleRef),
    Screen(ScreenPoint),
    World(WorldPoint),
}

impl Endpoint {
    pub fn handle(&self) -> Option<&HandleRef> {
        match self {
            Endpoint::Handle(handle) => Some(handle),
            _ => None,
        }
    }
}

impl From<HandleRef> for Endpoint {
    fn from(handle: HandleRef) -> Self {
        Endpoint::Handle(handle)
    }
}

impl From<ScreenPoint> for Endpoint {
    fn from(point: ScreenPoint) -> Self {
        Endpoint::Screen(point)
    }
}

impl From<WorldPoint> for Endpoint {
    fn from(point: WorldPoint) -> Self {
        Endpoint::World(point)
    }
}

/// A connection between two endpoints. Edge lists belong to the application.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub start: Endpoint,
    pub end: Endpoint,
}

impl Edge {
    pub fn new(start: impl Into<Endpoint>, end: impl Into<Endpoint>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Both endpoints when the edge joins two handles.
    pub fn handles(&self) -> Option<(&HandleRef, &HandleRef)> {
        Some((self.start.handle()?, self.end.handle()?))
    }

    /// True if this edge connects `a` and `b`, in either orientation.
    pub fn connects(&self, a: &HandleRef, b: &HandleRef) -> bool {
        match self.handles() {
            Some((start, end)) => (start == a && end == b) || (start == b && end == a),
            None => false,
        }
    }

    /// True if either endpoint is a handle of `node_id`.
    pub fn touches_node(&self, node_id: &NodeId) -> bool {
        [&self.start, &self.end]
            .into_iter()
            .filter_map(Endpoint::handle)
            .any(|h| &h.node_id == node_id)
    }
}

// ============================================================================
// Link Validation Framework
// ============================================================================

/// Result of link validation with optional rejection reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Link is valid
    Valid,
    /// Link is invalid with a reason
    Invalid(ValidationError),
}

impl ValidationResult {
    /// Check if the result is valid
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Combine two results (AND logic): returns first error if any
    pub fn and(self, other: ValidationResult) -> ValidationResult {
        match self {
            ValidationResult::Valid => other,
            invalid => invalid,
        }
    }
}

/// Reasons why a link validation failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Cannot link a handle to itself
    SameHandle,
    /// Cannot link handles on the same node
    SameNode,
    /// Both handles are outputs or both are inputs
    IncompatibleDirection,
    /// A link between these handles already exists
    DuplicateLink,
    /// Custom validation failure
    Custom(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SameHandle => write!(f, "Cannot link handle to itself"),
            Self::SameNode => write!(f, "Cannot link handles on same node"),
            Self::IncompatibleDirection => write!(f, "Must connect an output to an input"),
            Self::DuplicateLink => write!(f, "Link already exists"),
            Self::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

/// Trait for custom link validation logic.
///
/// Implement this to add rules for connecting handles. Use with
/// [`validate_link`] or compose several with [`CompositeValidator`].
///
/// # Example
///
/// ```
/// use slint_node_canvas::{Edge, HandleRef, LinkValidator, ValidationError, ValidationResult};
///
/// /// Only allow links into handles whose id starts with "in".
/// struct InputsOnly;
///
/// impl LinkValidator for InputsOnly {
///     fn validate(&self, start: &HandleRef, end: &HandleRef, _edges: &[Edge]) -> ValidationResult {
///         if start.handle_id.as_str().starts_with("in") || end.handle_id.as_str().starts_with("in") {
///             ValidationResult::Valid
///         } else {
///             ValidationResult::Invalid(ValidationError::Custom("no input".into()))
///         }
///     }
/// }
///
/// let ok = InputsOnly.validate(&HandleRef::new("a", "output"), &HandleRef::new("b", "in0"), &[]);
/// assert!(ok.is_valid());
/// ```
pub trait LinkValidator {
    /// Check if a link between two handles is valid.
    ///
    /// `edges` is the current edge collection, for duplicate or fan-out checks.
    fn validate(&self, start: &HandleRef, end: &HandleRef, edges: &[Edge]) -> ValidationResult;
}

/// Default validator: the directional handle rule.
///
/// A link is valid iff the handles sit on different nodes and exactly one of
/// them carries the reserved output identifier. The rule is symmetric in its
/// arguments.
#[derive(Clone, Debug)]
pub struct DirectionalValidator {
    output_handle: HandleId,
}

impl DirectionalValidator {
    pub fn new(output_handle: impl Into<HandleId>) -> Self {
        Self {
            output_handle: output_handle.into(),
        }
    }

    pub fn is_output(&self, handle: &HandleRef) -> bool {
        handle.handle_id == self.output_handle
    }
}

impl Default for DirectionalValidator {
    fn default() -> Self {
        Self::new("output")
    }
}

impl LinkValidator for DirectionalValidator {
    fn validate(&self, start: &HandleRef, end: &HandleRef, _edges: &[Edge]) -> ValidationResult {
        if start == end {
            return ValidationResult::Invalid(ValidationError::SameHandle);
        }
        if start.node_id == end.node_id {
            return ValidationResult::Invalid(ValidationError::SameNode);
        }
        if self.is_output(start) == self.is_output(end) {
            return ValidationResult::Invalid(ValidationError::IncompatibleDirection);
        }
        ValidationResult::Valid
    }
}

/// Validator that prevents a second link between the same pair of handles.
///
/// Orientation does not matter: an existing `a -> b` rejects `b -> a`.
#[derive(Clone, Debug, Default)]
pub struct NoDuplicatesValidator;

impl LinkValidator for NoDuplicatesValidator {
    fn validate(&self, start: &HandleRef, end: &HandleRef, edges: &[Edge]) -> ValidationResult {
        if edges.iter().any(|edge| edge.connects(start, end)) {
            ValidationResult::Invalid(ValidationError::DuplicateLink)
        } else {
            ValidationResult::Valid
        }
    }
}

/// Composite validator that combines multiple validators
///
/// All validators must return Valid for the link to be valid (AND logic).
/// Returns the first error encountered (short-circuits on failure).
///
/// ```
/// use slint_node_canvas::{CompositeValidator, DirectionalValidator, HandleRef, LinkValidator, NoDuplicatesValidator};
///
/// let validator = CompositeValidator::new()
///     .add(DirectionalValidator::default())
///     .add(NoDuplicatesValidator);
/// let result = validator.validate(&HandleRef::new("n1", "output"), &HandleRef::new("n2", "0"), &[]);
/// assert!(result.is_valid());
/// ```
#[derive(Default)]
pub struct CompositeValidator {
    validators: Vec<Box<dyn LinkValidator>>,
}

impl CompositeValidator {
    /// Create a new empty composite validator
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validator to the composite
    ///
    /// Validators are checked in the order they were added.
    pub fn add<V: LinkValidator + 'static>(mut self, validator: V) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Add a validator in place.
    pub fn push<V: LinkValidator + 'static>(&mut self, validator: V) {
        self.validators.push(Box::new(validator));
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl LinkValidator for CompositeValidator {
    fn validate(&self, start: &HandleRef, end: &HandleRef, edges: &[Edge]) -> ValidationResult {
        for v in &self.validators {
            let result = v.validate(start, end, edges);
            if !result.is_valid() {
                return result;
            }
        }
        ValidationResult::Valid
    }
}

/// Convenience function to validate a link with any validator
pub fn validate_link<V>(start: &HandleRef, end: &HandleRef, edges: &[Edge], validator: &V) -> ValidationResult
where
    V: LinkValidator + ?Sized,
{
    validator.validate(start, end, edges)
}

// ============================================================================
// Tests
// ============================================================================

use std::fmt;

/// Which side of the API a type sits on; picks the nullability wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Input,
    Output,
}

/// Named wrappers applied around field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrapper {
    Field,
    EntireField,
}

/// A rendered-to-be type, kept structured until printing so wrappers can be
/// stripped by shape instead of by matching text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A resolved identifier, e.g. `Scalars['ID']` or `User`.
    Named(String),
    List { item: Box<TypeExpr>, readonly: bool },
    Maybe { position: Position, inner: Box<TypeExpr> },
    Wrapped { wrapper: Wrapper, inner: Box<TypeExpr> },
}

/// A folded type node plus the one raw fact the parent still needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldedType {
    pub expr: TypeExpr,
    /// The original (pre-fold) node was `T!`.
    pub non_null: bool,
}

impl TypeExpr {
    pub fn named(ident: impl Into<String>) -> Self {
        TypeExpr::Named(ident.into())
    }

    pub fn list(self, readonly: bool) -> Self {
        TypeExpr::List { item: Box::new(self), readonly }
    }

    /// Wrap in the context's nullability wrapper.
    pub fn maybe(self, position: Position) -> Self {
        TypeExpr::Maybe { position, inner: Box::new(self) }
    }

    pub fn wrap(self, wrapper: Wrapper) -> Self {
        TypeExpr::Wrapped { wrapper, inner: Box::new(self) }
    }

    /// Strip the outermost nullability wrapper, if any.
    pub fn non_null(self) -> Self {
        match self {
            TypeExpr::Maybe { inner, .. } => *inner,
            other => other,
        }
    }

    pub fn is_maybe(&self) -> bool {
        matches!(self, TypeExpr::Maybe { .. })
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named(ident) => f.write_str(ident),
            TypeExpr::List { item, readonly: false } => write!(f, "Array<{item}>"),
            TypeExpr::List { item, readonly: true } => write!(f, "ReadonlyArray<{item}>"),
            TypeExpr::Maybe { position: Position::Output, inner } => write!(f, "Maybe<{inner}>"),
            TypeExpr::Maybe { position: Position::Input, inner } => write!(f, "InputMaybe<{inner}>"),
            TypeExpr::Wrapped { wrapper: Wrapper::Field, inner } => write!(f, "FieldWrapper<{inner}>"),
            TypeExpr::Wrapped { wrapper: Wrapper::EntireField, inner } => {
                write!(f, "EntireFieldWrapper<{inner}>")
            }
        }
    }
}

impl FoldedType {
    /// Leaf step for a named reference: wrap in the context's `Maybe`.
    pub fn named(resolved: TypeExpr, position: Position) -> Self {
        Self { expr: resolved.maybe(position), non_null: false }
    }

    /// Leave step for `[T]`: the context wrapper goes around the list,
    /// whatever happened to the item.
    pub fn list(item: FoldedType, position: Position, readonly: bool) -> Self {
        Self { expr: item.expr.list(readonly).maybe(position), non_null: false }
    }

    /// Leave step for `T!`.
    pub fn non_null(inner: FoldedType) -> Self {
        Self { expr: inner.expr.non_null(), non_null: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scalar(name: &str) -> TypeExpr {
        TypeExpr::named(format!("Scalars['{name}']"))
    }

    #[test]
    fn nested_lists_render_their_wrappers() {
        // [String!] in an output position
        let item = FoldedType::non_null(FoldedType::named(scalar("String"), Position::Output));
        let list = FoldedType::list(item, Position::Output, false);
        assert_eq!(list.expr.to_string(), "Maybe<Array<Scalars['String']>>");
        assert!(!list.non_null);

        // [[Int]!]! in an input position
        let inner = FoldedType::list(FoldedType::named(scalar("Int"), Position::Input), Position::Input, true);
        let outer = FoldedType::non_null(FoldedType::list(FoldedType::non_null(inner), Position::Input, true));
        assert_eq!(
            outer.expr.to_string(),
            "ReadonlyArray<ReadonlyArray<InputMaybe<Scalars['Int']>>>"
        );
        assert!(outer.non_null);
    }

    #[test]
    fn non_null_leaves_unwrapped_types_alone() {
        let ty = scalar("ID").wrap(Wrapper::Field);
        assert_eq!(ty.clone().non_null(), ty);
        assert_eq!(ty.to_string(), "FieldWrapper<Scalars['ID']>");
    }

    fn position() -> impl Strategy<Value = Position> {
        prop_oneof![Just(Position::Input), Just(Position::Output)]
    }

    fn type_expr() -> impl Strategy<Value = TypeExpr> {
        let leaf = "[A-Z][a-zA-Z]{0,8}".prop_map(TypeExpr::Named);
        leaf.prop_recursive(4, 16, 1, |inner| {
            prop_oneof![
                (inner.clone(), any::<bool>()).prop_map(|(t, ro)| t.list(ro)),
                (inner.clone(), position()).prop_map(|(t, p)| t.maybe(p)),
                inner.prop_map(|t| t.wrap(Wrapper::Field)),
            ]
        })
    }

    proptest! {
        /// Wrapping then applying the non-null rule reproduces the original rendering.
        #[test]
        fn maybe_then_non_null_is_identity(expr in type_expr(), pos in position()) {
            let rendered = expr.to_string();
            let round_trip = expr.clone().maybe(pos).non_null();
            prop_assert_eq!(round_trip.to_string(), rendered);
            prop_assert_eq!(round_trip, expr);
        }
    }
}

//! Component trait and implementations

/// Marker trait for components
///
/// Any plain data record can be a component. An entity holds at most one
/// value of each component type.
///
/// ```
/// use sim_core::ecs::Component;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// struct Position { x: f32, y: f32 }
///
/// impl Component for Position {}
/// ```
pub trait Component: 'static + Send + Sync {}

/// Short, human readable name of a component type, used in errors and logs
pub(crate) fn component_name<T: Component>() -> &'static str {
    let full = std::any::type_name::<T>();
    // Strip the module path but keep generic arguments intact
    let base_end = full.find('<').unwrap_or(full.len());
    full[..base_end]
        .rfind("::")
        .map_or(full, |pos| &full[pos + 2..])
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Health;
    impl Component for Health {}

    #[test]
    fn test_component_name_strips_module_path() {
        assert_eq!(component_name::<Health>(), "Health");
    }
}

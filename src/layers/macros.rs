//! Macros to reduce boilerplate in layer implementations

/// Implements the `LayerTrait` methods that only touch `LayerProperties`
///
/// This generates implementations for:
/// - id(), set_id(), name(), kind()
/// - opacity(), set_opacity()
/// - is_visible(), set_visible()
/// - as_any(), as_any_mut()
///
/// Usage:
/// ```ignore
/// impl LayerTrait for MyLayer {
///     mapstate::impl_layer_trait!(properties);
///     // remaining methods
/// }
/// ```
#[macro_export]
macro_rules! impl_layer_trait {
    ($properties_field:ident) => {
        fn id(&self) -> $crate::layers::base::LayerId {
            self.$properties_field.id
        }

        fn set_id(&mut self, id: $crate::layers::base::LayerId) {
            self.$properties_field.id = id;
        }

        fn name(&self) -> &str {
            &self.$properties_field.name
        }

        fn kind(&self) -> $crate::layers::base::LayerKind {
            self.$properties_field.kind
        }

        fn opacity(&self) -> f32 {
            self.$properties_field.opacity
        }

        fn set_opacity(&mut self, opacity: f32) {
            self.$properties_field.opacity = opacity.clamp(0.0, 1.0);
        }

        fn is_visible(&self) -> bool {
            self.$properties_field.visible
        }

        fn set_visible(&mut self, visible: bool) {
            self.$properties_field.visible = visible;
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
            self
        }
    };
}

#[macro_export]
macro_rules! define_rule {
    (
        $(#[$meta:meta])*
        $struct_name:ident,
        $name_str:expr,
        $targets:expr, // Option<TargetKindSet>
        priority: $prio:expr,
        | $arg:ident | $body:block
    ) => {
        $(#[$meta])*
        pub struct $struct_name;

        impl $crate::rule::SimpleRule for $struct_name {
            fn name(&self) -> &str {
                $name_str
            }

            fn apply_simple(&self, $arg: &cas_ast::Expr) -> Option<$crate::rule::Rewrite> {
                $body
            }

            fn target_types(&self) -> Option<cas_ast::TargetKindSet> {
                $targets
            }

            fn priority(&self) -> i32 {
                $prio
            }
        }
    };
    (
        $(#[$meta:meta])*
        $struct_name:ident,
        $name_str:expr,
        $targets:expr, // Option<TargetKindSet>
        | $arg:ident | $body:block
    ) => {
        $crate::define_rule!(
            $(#[$meta])*
            $struct_name,
            $name_str,
            $targets,
            priority: 0,
            | $arg | $body
        );
    };
    // Overload for no targets (default None)
    (
        $(#[$meta:meta])*
        $struct_name:ident,
        $name_str:expr,
        | $arg:ident | $body:block
    ) => {
        $crate::define_rule!(
            $(#[$meta])*
            $struct_name,
            $name_str,
            None,
            priority: 0,
            | $arg | $body
        );
    };
}

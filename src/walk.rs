//! Traversal over the declaration model.
//!
//! Every entity implements [`Walk`], which hands it to the matching visitor
//! hook. The default hooks descend through [`WalkChildren`], derived with
//! `#[derive(Walk)]`. Annotations are not visited.

use crate::entity::*;

// Core traits
pub trait Walk {
    fn walk<V: Visitor + ?Sized>(&self, v: &mut V);
    fn walk_mut<V: VisitorMut + ?Sized>(&mut self, v: &mut V);
}

/// Generated by `#[derive(Walk)]`: visits each field in declaration order.
pub trait WalkChildren {
    fn walk_children<V: Visitor + ?Sized>(&self, v: &mut V);
    fn walk_children_mut<V: VisitorMut + ?Sized>(&mut self, v: &mut V);
}

macro_rules! visitor_hooks {
    ($($ty:ty => $visit:ident),* $(,)?) => {
        pub trait Visitor {
            $(
                #[inline(always)]
                fn $visit(&mut self, node: &$ty) {
                    node.walk_children(self);
                }
            )*
        }
    };
}

macro_rules! visitor_mut_hooks {
    ($($ty:ty => $visit:ident),* $(,)?) => {
        pub trait VisitorMut {
            $(
                #[inline(always)]
                fn $visit(&mut self, node: &mut $ty) {
                    node.walk_children_mut(self);
                }
            )*
        }
    };
}

visitor_hooks! {
    Spec => visit_spec,
    SimpleSpec => visit_simple_spec,
    ArraySpec => visit_array_spec,
    MapSpec => visit_map_spec,
    StructSpec => visit_struct_spec,
    InterfaceSpec => visit_interface_spec,
    FuncSpec => visit_func_spec,
    Field => visit_field,
    Import => visit_import,
    ImportGroup => visit_import_group,
    Const => visit_const,
    ConstGroup => visit_const_group,
    Var => visit_var,
    VarGroup => visit_var_group,
    Type => visit_type,
    TypeGroup => visit_type_group,
    Func => visit_func,
    File => visit_file,
    Namespace => visit_namespace,
    Storage => visit_storage,
}

visitor_mut_hooks! {
    Spec => visit_spec_mut,
    SimpleSpec => visit_simple_spec_mut,
    ArraySpec => visit_array_spec_mut,
    MapSpec => visit_map_spec_mut,
    StructSpec => visit_struct_spec_mut,
    InterfaceSpec => visit_interface_spec_mut,
    FuncSpec => visit_func_spec_mut,
    Field => visit_field_mut,
    Import => visit_import_mut,
    ImportGroup => visit_import_group_mut,
    Const => visit_const_mut,
    ConstGroup => visit_const_group_mut,
    Var => visit_var_mut,
    VarGroup => visit_var_group_mut,
    Type => visit_type_mut,
    TypeGroup => visit_type_group_mut,
    Func => visit_func_mut,
    File => visit_file_mut,
    Namespace => visit_namespace_mut,
    Storage => visit_storage_mut,
}

// Entities dispatch to their hook
macro_rules! impl_walk_for_entities {
    ($($ty:ty => $visit:ident, $visit_mut:ident),* $(,)?) => {
        $(
            impl Walk for $ty {
                #[inline(always)]
                fn walk<V: Visitor + ?Sized>(&self, v: &mut V) {
                    v.$visit(self);
                }

                #[inline(always)]
                fn walk_mut<V: VisitorMut + ?Sized>(&mut self, v: &mut V) {
                    v.$visit_mut(self);
                }
            }
        )*
    };
}

impl_walk_for_entities! {
    Spec => visit_spec, visit_spec_mut,
    SimpleSpec => visit_simple_spec, visit_simple_spec_mut,
    ArraySpec => visit_array_spec, visit_array_spec_mut,
    MapSpec => visit_map_spec, visit_map_spec_mut,
    StructSpec => visit_struct_spec, visit_struct_spec_mut,
    InterfaceSpec => visit_interface_spec, visit_interface_spec_mut,
    FuncSpec => visit_func_spec, visit_func_spec_mut,
    Field => visit_field, visit_field_mut,
    Import => visit_import, visit_import_mut,
    ImportGroup => visit_import_group, visit_import_group_mut,
    Const => visit_const, visit_const_mut,
    ConstGroup => visit_const_group, visit_const_group_mut,
    Var => visit_var, visit_var_mut,
    VarGroup => visit_var_group, visit_var_group_mut,
    Type => visit_type, visit_type_mut,
    TypeGroup => visit_type_group, visit_type_group_mut,
    Func => visit_func, visit_func_mut,
    File => visit_file, visit_file_mut,
    Namespace => visit_namespace, visit_namespace_mut,
    Storage => visit_storage, visit_storage_mut,
}

// Utilities
impl<T: Walk> Walk for Option<T> {
    #[inline(always)]
    fn walk<V: Visitor + ?Sized>(&self, v: &mut V) {
        if let Some(x) = self {
            x.walk(v);
        }
    }

    #[inline(always)]
    fn walk_mut<V: VisitorMut + ?Sized>(&mut self, v: &mut V) {
        if let Some(x) = self {
            x.walk_mut(v);
        }
    }
}

impl<T: Walk> Walk for Vec<T> {
    #[inline(always)]
    fn walk<V: Visitor + ?Sized>(&self, v: &mut V) {
        for item in self {
            item.walk(v);
        }
    }

    #[inline(always)]
    fn walk_mut<V: VisitorMut + ?Sized>(&mut self, v: &mut V) {
        for item in self {
            item.walk_mut(v);
        }
    }
}

impl<T: Walk> Walk for Box<T> {
    #[inline(always)]
    fn walk<V: Visitor + ?Sized>(&self, v: &mut V) {
        (**self).walk(v);
    }

    #[inline(always)]
    fn walk_mut<V: VisitorMut + ?Sized>(&mut self, v: &mut V) {
        (**self).walk_mut(v);
    }
}

// No-ops para tipos hoja
macro_rules! impl_walk_noop {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Walk for $ty {
                #[inline(always)]
                fn walk<V: Visitor + ?Sized>(&self, _: &mut V) {}

                #[inline(always)]
                fn walk_mut<V: VisitorMut + ?Sized>(&mut self, _: &mut V) {}
            }
        )*
    };
}

impl_walk_noop!(String, bool);

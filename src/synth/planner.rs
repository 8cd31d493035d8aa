// src/synth/planner.rs

use rustc_hash::FxHashMap;

use super::ir::{Expr, Stmt};
use super::naming::{self, LocalNames};
use super::*;
use crate::errors::PlanError;
use crate::model::{InterfaceSpec, MethodSpec, Signature, TypeRef};

/// Plan the generated file for `spec`.
///
/// Fails before planning anything when two members of the carrier would
/// share a name.
#[tracing::instrument(skip_all, fields(interface = %spec.name))]
pub fn plan(spec: &InterfaceSpec) -> Result<Plan, PlanError> {
    check_member_names(spec)?;

    let carrier = naming::carrier(&spec.name);
    let mut top_level = vec![
        spec.name.clone(),
        carrier.clone(),
        naming::constructor(&spec.name),
    ];
    for method in &spec.methods {
        top_level.push(naming::before_func(&method.name));
        top_level.push(naming::after_func(&method.name));
        top_level.push(naming::hooks_struct(&method.name));
    }
    let reserved: Vec<&str> = top_level.iter().map(String::as_str).collect();
    let imports = ImportTable::new(spec.imports.values(), &reserved);

    let mut units = Vec::with_capacity(2 + 2 * spec.methods.len());
    units.push(SynthesisUnit::Constructor(constructor(spec, &carrier)));
    units.push(SynthesisUnit::Carrier(carrier_type(spec, &carrier)));
    for method in &spec.methods {
        units.push(SynthesisUnit::HookTypes(hook_types(method)));
    }
    for method in &spec.methods {
        units.push(SynthesisUnit::Method(method_impl(
            spec, &carrier, method, &imports,
        )));
    }

    tracing::debug!(units = units.len(), imports = imports.len(), "planned");
    Ok(Plan {
        package: spec.package.clone(),
        imports,
        units,
    })
}

/// Every member of the carrier (the delegate field, the hook fields and
/// the methods themselves) needs its own name under `collision_key`.
fn check_member_names(spec: &InterfaceSpec) -> Result<(), PlanError> {
    let fields = std::iter::once((naming::WRAPPED.to_string(), "the delegate field".to_string()))
        .chain(spec.methods.iter().map(|method| {
            (
                naming::hook_field(&method.name),
                format!("the hook field of '{}'", method.name),
            )
        }));
    let methods = spec
        .methods
        .iter()
        .map(|method| (method.name.clone(), format!("method '{}'", method.name)));

    let mut seen: FxHashMap<String, String> = FxHashMap::default();
    for (member, owner) in fields.chain(methods) {
        if let Some(first) = seen.insert(naming::collision_key(&member), owner.clone()) {
            return Err(PlanError::DuplicateFieldName {
                field: member,
                first,
                second: owner,
            });
        }
    }
    Ok(())
}

/// `func WrapT(toWrap T, wrapper TMiddleware) T`
fn constructor(spec: &InterfaceSpec, carrier: &str) -> ConstructorUnit {
    let name = naming::constructor(&spec.name);
    let wrapper = Expr::ident(naming::WRAPPER);
    ConstructorUnit {
        func: FuncDecl {
            doc: vec![format!(
                "{name} returns {} wrapped in the hooks configured on {}.",
                naming::TO_WRAP,
                naming::WRAPPER
            )],
            receiver: None,
            name,
            params: vec![
                Binding {
                    name: naming::TO_WRAP.to_string(),
                    ty: TypeRef::local(&spec.name),
                    variadic: false,
                },
                Binding {
                    name: naming::WRAPPER.to_string(),
                    ty: TypeRef::local(carrier),
                    variadic: false,
                },
            ],
            results: vec![TypeRef::local(&spec.name)],
            body: vec![
                Stmt::Assign {
                    targets: vec![wrapper.clone().field(naming::WRAPPED)],
                    value: Expr::ident(naming::TO_WRAP),
                },
                Stmt::Return(vec![Expr::AddressOf(Box::new(wrapper))]),
            ],
        },
    }
}

fn carrier_type(spec: &InterfaceSpec, carrier: &str) -> CarrierTypeUnit {
    let mut groups = vec![vec![FieldDef {
        name: naming::WRAPPED.to_string(),
        ty: TypeRef::local(&spec.name),
    }]];
    if !spec.methods.is_empty() {
        groups.push(
            spec.methods
                .iter()
                .map(|method| FieldDef {
                    name: naming::hook_field(&method.name),
                    ty: TypeRef::local(naming::hooks_struct(&method.name)),
                })
                .collect(),
        );
    }
    CarrierTypeUnit {
        decl: StructDecl {
            doc: vec![format!(
                "{carrier} wraps an implementation of {} and runs the configured hooks around each of its methods.",
                spec.name
            )],
            name: carrier.to_string(),
            groups,
        },
    }
}

/// Parameter types as a value list: a variadic `...E` becomes `[]E`.
fn param_values(method: &MethodSpec) -> Vec<TypeRef> {
    let last = method.params.len().saturating_sub(1);
    method
        .params
        .iter()
        .enumerate()
        .map(|(i, param)| {
            if method.variadic && i == last {
                TypeRef::Slice(Box::new(param.ty.clone()))
            } else {
                param.ty.clone()
            }
        })
        .collect()
}

fn hook_types(method: &MethodSpec) -> HookTypeUnit {
    let name = &method.name;
    let params = method.signature();
    let values = param_values(method);

    // func(P...) (P..., R..., bool)
    let mut before_results = values.clone();
    before_results.extend(method.results.iter().cloned());
    before_results.push(TypeRef::local("bool"));
    let before = Signature {
        params: params.params.clone(),
        results: before_results,
        variadic: method.variadic,
    };

    // func(P..., R...) (R...); a pure observer when there are no results
    let after = if method.results.is_empty() {
        Signature {
            params: params.params,
            results: Vec::new(),
            variadic: method.variadic,
        }
    } else {
        let mut after_params = values;
        after_params.extend(method.results.iter().cloned());
        Signature {
            params: after_params,
            results: method.results.clone(),
            variadic: false,
        }
    };

    let before_name = naming::before_func(name);
    let after_name = naming::after_func(name);
    let hooks_name = naming::hooks_struct(name);

    let after_doc = if method.results.is_empty() {
        vec![format!("{after_name} runs after the wrapped {name} call.")]
    } else {
        vec![format!(
            "{after_name} runs after the wrapped {name} call and returns the results to hand back to the caller."
        )]
    };

    HookTypeUnit {
        method: name.clone(),
        before: TypeDecl {
            doc: vec![
                format!("{before_name} runs before the wrapped {name} call and may replace its arguments."),
                "Returning true as the last value skips the call and returns the given results.".to_string(),
            ],
            name: before_name.clone(),
            ty: TypeRef::Func(before),
        },
        after: TypeDecl {
            doc: after_doc,
            name: after_name.clone(),
            ty: TypeRef::Func(after),
        },
        hooks: StructDecl {
            doc: vec![format!("{hooks_name} holds the optional hooks run around {name}.")],
            name: hooks_name,
            groups: vec![vec![
                FieldDef {
                    name: naming::BEFORE.to_string(),
                    ty: TypeRef::local(before_name),
                },
                FieldDef {
                    name: naming::AFTER.to_string(),
                    ty: TypeRef::local(after_name),
                },
            ]],
        },
    }
}

/// Pick local names: receiver, flag and results first, then parameters,
/// which keep their declared names when those are free.
fn locals(method: &MethodSpec, imports: &ImportTable) -> (Vec<String>, Vec<String>) {
    let mut names = LocalNames::new();
    names.claim(naming::RECEIVER);
    names.claim(naming::SKIP);
    names.claim("nil");
    names.claim("bool");
    for import in imports.iter() {
        names.claim(&import.name);
    }
    for ty in method.params.iter().map(|p| &p.ty).chain(&method.results) {
        names.reserve_type_names(ty);
    }

    let results: Vec<String> = (0..method.results.len())
        .map(|i| names.fresh(&naming::result(i)))
        .collect();

    let params = method
        .params
        .iter()
        .enumerate()
        .map(|(i, param)| match &param.name {
            Some(name) if naming::is_identifier(name) && names.claim(name) => name.clone(),
            _ => names.fresh(&format!("p{i}")),
        })
        .collect();

    (params, results)
}

fn method_impl(
    spec: &InterfaceSpec,
    carrier: &str,
    method: &MethodSpec,
    imports: &ImportTable,
) -> MethodImplUnit {
    let (params, results) = locals(method, imports);
    let hook = Expr::ident(naming::RECEIVER).field(naming::hook_field(&method.name));
    let before = hook.clone().field(naming::BEFORE);
    let after = hook.field(naming::AFTER);

    let param_exprs: Vec<Expr> = params.iter().map(Expr::ident).collect();
    let result_exprs: Vec<Expr> = results.iter().map(Expr::ident).collect();

    let mut body = Vec::new();

    // Before hook: may replace the arguments or short-circuit
    let mut before_block: Vec<Stmt> = results
        .iter()
        .zip(&method.results)
        .map(|(name, ty)| Stmt::Var {
            name: name.clone(),
            ty: ty.clone(),
        })
        .collect();
    before_block.push(Stmt::Var {
        name: naming::SKIP.to_string(),
        ty: TypeRef::local("bool"),
    });
    let mut targets = param_exprs.clone();
    targets.extend(result_exprs.iter().cloned());
    targets.push(Expr::ident(naming::SKIP));
    before_block.push(Stmt::Assign {
        targets,
        value: before.clone().call(param_exprs.clone(), method.variadic),
    });
    before_block.push(Stmt::If {
        cond: Expr::ident(naming::SKIP),
        then: vec![Stmt::Return(result_exprs.clone())],
    });
    body.push(Stmt::If {
        cond: Expr::NotNil(Box::new(before)),
        then: before_block,
    });

    // Delegate
    let delegate = Expr::ident(naming::RECEIVER)
        .field(naming::WRAPPED)
        .field(&method.name)
        .call(param_exprs.clone(), method.variadic);
    if results.is_empty() {
        body.push(Stmt::Expr(delegate));
    } else {
        body.push(Stmt::Define {
            names: results.clone(),
            value: delegate,
        });
    }

    // After hook: observes, and replaces the results if there are any
    let after_call = if results.is_empty() {
        Stmt::Expr(after.clone().call(param_exprs, method.variadic))
    } else {
        let mut args = param_exprs;
        args.extend(result_exprs.iter().cloned());
        Stmt::Assign {
            targets: result_exprs.clone(),
            value: after.clone().call(args, false),
        }
    };
    body.push(Stmt::If {
        cond: Expr::NotNil(Box::new(after)),
        then: vec![after_call],
    });

    if !results.is_empty() {
        body.push(Stmt::Return(result_exprs));
    }

    let last = params.len().saturating_sub(1);
    let bindings = params
        .into_iter()
        .zip(&method.params)
        .enumerate()
        .map(|(i, (name, param))| Binding {
            name,
            ty: param.ty.clone(),
            variadic: method.variadic && i == last,
        })
        .collect();

    MethodImplUnit {
        method: method.name.clone(),
        func: FuncDecl {
            doc: vec![format!(
                "{} calls the wrapped {}, running {} around the call.",
                method.name,
                spec.name,
                naming::hook_field(&method.name)
            )],
            receiver: Some(Binding {
                name: naming::RECEIVER.to_string(),
                ty: TypeRef::Pointer(Box::new(TypeRef::local(carrier))),
                variadic: false,
            }),
            name: method.name.clone(),
            params: bindings,
            results: method.results.clone(),
            body,
        },
    }
}

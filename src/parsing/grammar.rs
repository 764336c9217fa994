//! Module, statement and expression grammar
//!
//! The grammar is built bottom-up from the lexemes in [`super::lexical`].
//! Statements and expressions are mutually recursive through blocks (function
//! bodies) so the expression parser receives the block parser as an argument.
//! TypeScript syntax is only accepted when [`Features::typescript`] is set, JSX
//! only when [`Features::jsx`] is set.

use chumsky::prelude::*;
use chumsky::BoxedParser;

use super::jsx;
use super::lexical::{
    ident, kw, lexeme, number, string_lit, sym, template_lit, trivia, word, ParserError,
};
use super::types::{annotation, ts_type, type_params};
use crate::ast::*;

type Boxed<O> = BoxedParser<'static, char, O, ParserError>;

/// Syntax extensions enabled for a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Features {
    pub typescript: bool,
    pub jsx: bool,
}

impl Features {
    fn annotation(&self) -> Boxed<()> {
        if self.typescript {
            annotation()
        } else {
            empty().boxed()
        }
    }

    fn optional_marker(&self) -> Boxed<()> {
        if self.typescript {
            sym("?").or_not().ignored().boxed()
        } else {
            empty().boxed()
        }
    }

    fn type_params(&self) -> Boxed<()> {
        if self.typescript {
            type_params()
        } else {
            empty().boxed()
        }
    }
}

fn semi() -> Boxed<()> {
    sym(";").or_not().ignored().boxed()
}

fn with_default(pat: Pat, default: Option<Expr>) -> Pat {
    match default {
        Some(right) => Pat::Assign {
            left: Box::new(pat),
            right: Box::new(right),
        },
        None => pat,
    }
}

fn prop_name(expr: Boxed<Expr>) -> Boxed<PropName> {
    choice((
        string_lit().map(PropName::Str),
        number().map(PropName::Num),
        expr.delimited_by(sym("["), sym("]"))
            .map(|e| PropName::Computed(Box::new(e))),
        word().map(|w| PropName::Ident(Ident::new(w))),
    ))
    .boxed()
}

/// Binding patterns without a top-level default: `a`, `[a, b = 1]`, `{ a, b: c, ...rest }`.
fn binding_pattern(expr: Boxed<Expr>) -> Boxed<Pat> {
    recursive(move |pat| {
        let default = sym("=").ignore_then(expr.clone()).or_not();

        let element = sym("...")
            .ignore_then(pat.clone())
            .map(|p| Pat::Rest(Box::new(p)))
            .or(pat
                .clone()
                .then(default.clone())
                .map(|(p, d)| with_default(p, d)));
        let array = element
            .separated_by(sym(","))
            .allow_trailing()
            .delimited_by(sym("["), sym("]"))
            .map(Pat::Array);

        let prop = choice((
            sym("...")
                .ignore_then(pat.clone())
                .map(|p| ObjectPatProp::Rest(Box::new(p))),
            prop_name(expr.clone())
                .then_ignore(sym(":"))
                .then(pat.clone())
                .then(default.clone())
                .map(|((key, value), d)| ObjectPatProp::KeyValue {
                    key,
                    value: with_default(value, d),
                }),
            ident()
                .then(default)
                .map(|(name, d)| ObjectPatProp::Shorthand {
                    ident: Ident::new(name),
                    default: d.map(Box::new),
                }),
        ));
        let object = prop
            .separated_by(sym(","))
            .allow_trailing()
            .delimited_by(sym("{"), sym("}"))
            .map(Pat::Object);

        choice((
            array,
            object,
            ident().map(|name| Pat::Ident(Ident::new(name))),
        ))
    })
    .boxed()
}

/// A parenthesised parameter list.
fn params(features: Features, expr: Boxed<Expr>) -> Boxed<Vec<Pat>> {
    let pat = binding_pattern(expr.clone());
    let rest = sym("...")
        .ignore_then(pat.clone())
        .then_ignore(features.annotation())
        .map(|p| Pat::Rest(Box::new(p)));
    let plain = pat
        .then_ignore(features.optional_marker())
        .then_ignore(features.annotation())
        .then(sym("=").ignore_then(expr).or_not())
        .map(|(p, d)| with_default(p, d));

    rest.or(plain)
        .separated_by(sym(","))
        .allow_trailing()
        .delimited_by(sym("("), sym(")"))
        .boxed()
}

/// Everything after a function's name: type parameters, parameters, return type, body.
fn function_tail(
    features: Features,
    params: Boxed<Vec<Pat>>,
    block: Boxed<BlockStmt>,
) -> Boxed<(Vec<Pat>, BlockStmt)> {
    features
        .type_params()
        .ignore_then(params)
        .then_ignore(features.annotation())
        .then(block)
        .boxed()
}

enum MemberBody {
    Method(Function),
    Property(Option<Expr>),
}

/// Everything after a class's name: heritage clauses and the member list.
fn class_tail(features: Features, expr: Boxed<Expr>, block: Boxed<BlockStmt>) -> Boxed<Class> {
    let key = prop_name(expr.clone());
    let tail = function_tail(features, params(features, expr.clone()), block);

    let modifiers: Boxed<()> = if features.typescript {
        choice((
            kw("public"),
            kw("private"),
            kw("protected"),
            kw("readonly"),
            kw("override"),
        ))
        .repeated()
        .ignored()
        .boxed()
    } else {
        empty().boxed()
    };
    let implements: Boxed<()> = if features.typescript {
        kw("implements")
            .ignore_then(ts_type().separated_by(sym(",")).at_least(1))
            .or_not()
            .ignored()
            .boxed()
    } else {
        empty().boxed()
    };

    let method = kw("async")
        .or_not()
        .then(key.clone())
        .then(tail)
        .map(|((is_async, key), (params, body))| {
            (
                key,
                MemberBody::Method(Function {
                    params,
                    body,
                    is_async: is_async.is_some(),
                }),
            )
        });
    let property = key
        .then_ignore(features.optional_marker())
        .then_ignore(features.annotation())
        .then(sym("=").ignore_then(expr.clone()).or_not())
        .then_ignore(semi())
        .map(|(key, value)| (key, MemberBody::Property(value)));

    let member = kw("static")
        .or_not()
        .then_ignore(modifiers)
        .then(method.or(property))
        .map(|(is_static, (key, body))| {
            let is_static = is_static.is_some();
            match body {
                MemberBody::Method(function) => ClassMember::Method {
                    key,
                    function,
                    is_static,
                },
                MemberBody::Property(value) => ClassMember::Property {
                    key,
                    value: value.map(Box::new),
                    is_static,
                },
            }
        });

    features
        .type_params()
        .ignore_then(kw("extends").ignore_then(expr).or_not())
        .then_ignore(implements)
        .then(
            sym(";")
                .repeated()
                .ignore_then(member.then_ignore(sym(";").repeated()).repeated())
                .delimited_by(sym("{"), sym("}")),
        )
        .map(|(super_class, members)| Class {
            super_class: super_class.map(Box::new),
            members,
        })
        .boxed()
}

enum Suffix {
    Member(MemberProp, bool),
    Call(Vec<ExprOrSpread>, bool),
}

fn apply_suffix(expr: Expr, suffix: Suffix) -> Expr {
    match suffix {
        Suffix::Member(prop, optional) => Expr::Member(MemberExpr {
            obj: Box::new(expr),
            prop,
            optional,
        }),
        Suffix::Call(args, optional) => Expr::Call(CallExpr {
            callee: Box::new(expr),
            args,
            optional,
        }),
    }
}

fn binary(operand: Boxed<Expr>, op: Boxed<BinaryOp>) -> Boxed<Expr> {
    operand
        .clone()
        .then(op.then(operand).repeated())
        .foldl(|left, (op, right)| {
            Expr::Bin(BinExpr {
                op,
                left: Box::new(left),
                right: Box::new(right),
            })
        })
        .boxed()
}

fn expression(features: Features, block: Boxed<BlockStmt>) -> Boxed<Expr> {
    recursive(move |expr| {
        let expr: Boxed<Expr> = expr.boxed();
        let params = params(features, expr.clone());
        let tail = function_tail(features, params.clone(), block.clone());

        let literal = choice((
            string_lit().map(Lit::Str),
            template_lit().map(Lit::Template),
            number().map(Lit::Num),
            kw("true").to(Lit::Bool(true)),
            kw("false").to(Lit::Bool(false)),
            kw("null").to(Lit::Null),
        ))
        .map(Expr::Lit);

        let spreadable = sym("...")
            .or_not()
            .then(expr.clone())
            .map(|(spread, e)| ExprOrSpread {
                spread: spread.is_some(),
                expr: Box::new(e),
            });
        let args = spreadable
            .clone()
            .separated_by(sym(","))
            .allow_trailing()
            .delimited_by(sym("("), sym(")"))
            .boxed();
        let array = spreadable
            .separated_by(sym(","))
            .allow_trailing()
            .delimited_by(sym("["), sym("]"))
            .map(Expr::Array);

        let prop = choice((
            sym("...")
                .ignore_then(expr.clone())
                .map(|e| PropOrSpread::Spread(Box::new(e))),
            prop_name(expr.clone())
                .then_ignore(sym(":"))
                .then(expr.clone())
                .map(|(key, value)| {
                    PropOrSpread::Prop(Prop::KeyValue {
                        key,
                        value: Box::new(value),
                    })
                }),
            ident().map(|name| PropOrSpread::Prop(Prop::Shorthand(Ident::new(name)))),
        ));
        let object = prop
            .separated_by(sym(","))
            .allow_trailing()
            .delimited_by(sym("{"), sym("}"))
            .map(Expr::Object);

        // A `{` after `=>` always opens a block; object bodies need parentheses.
        let expr_body = filter::<char, _, ParserError>(|c: &char| *c != '{')
            .rewind()
            .ignore_then(expr.clone())
            .map(|e| ArrowBody::Expr(Box::new(e)));
        let arrow_body = block.clone().map(ArrowBody::Block).or(expr_body);
        let arrow = kw("async")
            .or_not()
            .then(params.or(ident().map(|name| vec![Pat::Ident(Ident::new(name))])))
            .then_ignore(features.annotation())
            .then_ignore(sym("=>"))
            .then(arrow_body)
            .map(|((is_async, params), body)| {
                Expr::Arrow(ArrowExpr {
                    params,
                    body,
                    is_async: is_async.is_some(),
                })
            });

        let function = kw("async")
            .or_not()
            .then_ignore(kw("function"))
            .then(ident().or_not())
            .then(tail)
            .map(|((is_async, name), (params, body))| {
                Expr::Fn(FnExpr {
                    ident: name.map(Ident::new),
                    function: Function {
                        params,
                        body,
                        is_async: is_async.is_some(),
                    },
                })
            });

        let class = kw("class")
            .ignore_then(ident().or_not())
            .then(class_tail(features, expr.clone(), block.clone()))
            .map(|(name, class)| {
                Expr::Class(ClassExpr {
                    ident: name.map(Ident::new),
                    class,
                })
            });

        let markup: Boxed<Expr> = if features.jsx {
            lexeme(jsx::element(expr.clone())).map(Expr::Jsx).boxed()
        } else {
            just('<')
                .try_map(|_, span| {
                    Err::<Expr, _>(Simple::custom(
                        span,
                        "JSX syntax requires the markup extension",
                    ))
                })
                .boxed()
        };

        let primary = choice((
            arrow,
            function,
            class,
            markup,
            literal,
            kw("this").to(Expr::This),
            ident().map(|name| Expr::Ident(Ident::new(name))),
            array,
            object,
            expr.clone().delimited_by(sym("("), sym(")")),
        ))
        .boxed();

        let member_suffix = choice((
            sym("?.")
                .ignore_then(word())
                .map(|p| Suffix::Member(MemberProp::Ident(Ident::new(p)), true)),
            sym(".")
                .ignore_then(word())
                .map(|p| Suffix::Member(MemberProp::Ident(Ident::new(p)), false)),
            expr.clone()
                .delimited_by(sym("["), sym("]"))
                .map(|e| Suffix::Member(MemberProp::Computed(Box::new(e)), false)),
        ))
        .boxed();
        let call_suffix = choice((
            sym("?.")
                .ignore_then(args.clone())
                .map(|a| Suffix::Call(a, true)),
            args.clone().map(|a| Suffix::Call(a, false)),
        ));

        let new_expr = kw("new")
            .ignore_then(
                primary
                    .clone()
                    .then(member_suffix.clone().repeated())
                    .foldl(apply_suffix),
            )
            .then(args.or_not())
            .map(|(callee, args)| {
                Expr::New(NewExpr {
                    callee: Box::new(callee),
                    args,
                })
            });
        let postfix = new_expr
            .or(primary)
            .then(member_suffix.or(call_suffix).repeated())
            .foldl(apply_suffix)
            .boxed();

        let cast: Boxed<()> = if features.typescript {
            kw("as").ignore_then(ts_type()).repeated().ignored().boxed()
        } else {
            empty().boxed()
        };
        let unary = choice((
            sym("!").to(UnaryOp::Not),
            sym("-").to(UnaryOp::Minus),
            sym("+").to(UnaryOp::Plus),
            kw("typeof").to(UnaryOp::TypeOf),
            kw("void").to(UnaryOp::Void),
            kw("await").to(UnaryOp::Await),
        ))
        .repeated()
        .then(postfix)
        .foldr(|op, arg| {
            Expr::Unary(UnaryExpr {
                op,
                arg: Box::new(arg),
            })
        })
        .then_ignore(cast)
        .boxed();

        let multiplicative = binary(
            unary,
            choice((
                sym("*").to(BinaryOp::Mul),
                sym("/").to(BinaryOp::Div),
                sym("%").to(BinaryOp::Mod),
            ))
            .boxed(),
        );
        let additive = binary(
            multiplicative,
            choice((sym("+").to(BinaryOp::Add), sym("-").to(BinaryOp::Sub))).boxed(),
        );
        let relational = binary(
            additive,
            choice((
                sym("<=").to(BinaryOp::LtEq),
                sym(">=").to(BinaryOp::GtEq),
                sym("<").to(BinaryOp::Lt),
                sym(">").to(BinaryOp::Gt),
                kw("instanceof").to(BinaryOp::InstanceOf),
                kw("in").to(BinaryOp::In),
            ))
            .boxed(),
        );
        let equality = binary(
            relational,
            choice((
                sym("===").to(BinaryOp::EqEqEq),
                sym("!==").to(BinaryOp::NotEqEq),
                sym("==").to(BinaryOp::EqEq),
                sym("!=").to(BinaryOp::NotEq),
            ))
            .boxed(),
        );
        let logical_and = binary(equality, sym("&&").to(BinaryOp::LogicalAnd).boxed());
        let logical_or = binary(logical_and, sym("||").to(BinaryOp::LogicalOr).boxed());
        let nullish = binary(
            logical_or,
            sym("??").to(BinaryOp::NullishCoalescing).boxed(),
        );

        let conditional = nullish
            .then(
                sym("?")
                    .ignore_then(expr.clone())
                    .then_ignore(sym(":"))
                    .then(expr.clone())
                    .or_not(),
            )
            .map(|(test, branches)| match branches {
                Some((cons, alt)) => Expr::Cond(CondExpr {
                    test: Box::new(test),
                    cons: Box::new(cons),
                    alt: Box::new(alt),
                }),
                None => test,
            });

        let assign_op = choice((
            sym("??=").to(AssignOp::NullishAssign),
            sym("||=").to(AssignOp::OrAssign),
            sym("&&=").to(AssignOp::AndAssign),
            sym("+=").to(AssignOp::AddAssign),
            sym("-=").to(AssignOp::SubAssign),
            sym("=").to(AssignOp::Assign),
        ));

        conditional
            .then(assign_op.then(expr).or_not())
            .map(|(target, assignment)| match assignment {
                Some((op, value)) => Expr::Assign(AssignExpr {
                    op,
                    target: Box::new(target),
                    value: Box::new(value),
                }),
                None => target,
            })
    })
    .boxed()
}

fn block_of<P>(stmt: P) -> Boxed<BlockStmt>
where
    P: Parser<char, Stmt, Error = ParserError> + Clone + 'static,
{
    stmt.repeated()
        .delimited_by(sym("{"), sym("}"))
        .map(|stmts| BlockStmt { stmts })
        .boxed()
}

fn declaration(features: Features, expr: Boxed<Expr>, block: Boxed<BlockStmt>) -> Boxed<Decl> {
    let tail = function_tail(features, params(features, expr.clone()), block.clone());

    let declarator = binding_pattern(expr.clone())
        .then_ignore(features.annotation())
        .then(sym("=").ignore_then(expr.clone()).or_not())
        .map(|(name, init)| VarDeclarator {
            name,
            init: init.map(Box::new),
        });
    let var = choice((
        kw("const").to(VarKind::Const),
        kw("let").to(VarKind::Let),
        kw("var").to(VarKind::Var),
    ))
    .then(declarator.separated_by(sym(",")).at_least(1))
    .then_ignore(semi())
    .map(|(kind, decls)| Decl::Var(VarDecl { kind, decls }));

    let function = kw("async")
        .or_not()
        .then_ignore(kw("function"))
        .then(ident())
        .then(tail)
        .map(|((is_async, name), (params, body))| {
            Decl::Fn(FnDecl {
                ident: Ident::new(name),
                function: Function {
                    params,
                    body,
                    is_async: is_async.is_some(),
                },
            })
        });

    let class = kw("class")
        .ignore_then(ident())
        .then(class_tail(features, expr, block))
        .map(|(name, class)| {
            Decl::Class(ClassDecl {
                ident: Ident::new(name),
                class,
            })
        });

    let runtime = choice((var, function, class));
    if !features.typescript {
        return runtime.boxed();
    }

    let alias = kw("type")
        .ignore_then(ident())
        .then_ignore(type_params())
        .then_ignore(sym("="))
        .then_ignore(ts_type())
        .then_ignore(semi());
    let interface = kw("interface")
        .ignore_then(ident())
        .then_ignore(type_params())
        .then_ignore(
            kw("extends")
                .ignore_then(ts_type().separated_by(sym(",")).at_least(1))
                .or_not(),
        )
        .then_ignore(ts_type());

    runtime
        .or(alias
            .or(interface)
            .map(|name| Decl::TsType(Ident::new(name))))
        .boxed()
}

fn statement(features: Features) -> Boxed<Stmt> {
    recursive(move |stmt| {
        let block = block_of(stmt.clone());
        let expr = expression(features, block.clone());
        let decl = declaration(features, expr.clone(), block.clone());

        choice((
            block.map(Stmt::Block),
            decl.map(Stmt::Decl),
            kw("return")
                .ignore_then(expr.clone().or_not())
                .then_ignore(semi())
                .map(|arg| Stmt::Return(arg.map(Box::new))),
            kw("if")
                .ignore_then(expr.clone().delimited_by(sym("("), sym(")")))
                .then(stmt.clone())
                .then(kw("else").ignore_then(stmt.clone()).or_not())
                .map(|((test, cons), alt)| {
                    Stmt::If(IfStmt {
                        test: Box::new(test),
                        cons: Box::new(cons),
                        alt: alt.map(Box::new),
                    })
                }),
            kw("throw")
                .ignore_then(expr.clone())
                .then_ignore(semi())
                .map(|e| Stmt::Throw(Box::new(e))),
            sym(";").to(Stmt::Empty),
            expr.then_ignore(semi()).map(|e| Stmt::Expr(Box::new(e))),
        ))
    })
    .boxed()
}

fn import_decl(features: Features) -> Boxed<ImportDecl> {
    let named = word()
        .then(kw("as").ignore_then(ident()).or_not())
        .map(|(imported, local)| match local {
            Some(local) => ImportSpecifier::Named {
                local: Ident::new(local),
                imported: Some(Ident::new(imported)),
            },
            None => ImportSpecifier::Named {
                local: Ident::new(imported),
                imported: None,
            },
        });
    let named_list = named
        .separated_by(sym(","))
        .allow_trailing()
        .delimited_by(sym("{"), sym("}"));
    let namespace = sym("*")
        .ignore_then(kw("as"))
        .ignore_then(ident())
        .map(|name| vec![ImportSpecifier::Namespace(Ident::new(name))]);
    let with_default = ident()
        .then(
            sym(",")
                .ignore_then(named_list.clone().or(namespace.clone()))
                .or_not(),
        )
        .map(|(name, rest)| {
            let mut specifiers = vec![ImportSpecifier::Default(Ident::new(name))];
            specifiers.extend(rest.unwrap_or_default());
            specifiers
        });
    let specifiers = choice((named_list, namespace, with_default));

    let type_only: Boxed<bool> = if features.typescript {
        kw("type").or_not().map(|t| t.is_some()).boxed()
    } else {
        empty().to(false).boxed()
    };

    let bare = string_lit().map(|source| ImportDecl {
        specifiers: Vec::new(),
        source,
        type_only: false,
    });
    let with_clause = type_only
        .then(specifiers)
        .then_ignore(kw("from"))
        .then(string_lit())
        .map(|((type_only, specifiers), source)| ImportDecl {
            specifiers,
            source,
            type_only,
        });

    kw("import")
        .ignore_then(bare.or(with_clause))
        .then_ignore(semi())
        .boxed()
}

fn export_decl(
    features: Features,
    expr: Boxed<Expr>,
    decl: Boxed<Decl>,
    block: Boxed<BlockStmt>,
) -> Boxed<ExportDecl> {
    let tail = function_tail(features, params(features, expr.clone()), block.clone());

    let default_fn = kw("async")
        .or_not()
        .then_ignore(kw("function"))
        .then(ident().or_not())
        .then(tail)
        .map(|((is_async, name), (params, body))| {
            DefaultExport::Fn(FnExpr {
                ident: name.map(Ident::new),
                function: Function {
                    params,
                    body,
                    is_async: is_async.is_some(),
                },
            })
        });
    let default_class = kw("class")
        .ignore_then(ident().or_not())
        .then(class_tail(features, expr.clone(), block))
        .map(|(name, class)| {
            DefaultExport::Class(ClassExpr {
                ident: name.map(Ident::new),
                class,
            })
        });
    let default_expr = expr
        .then_ignore(semi())
        .map(|e| DefaultExport::Expr(Box::new(e)));
    let default = kw("default")
        .ignore_then(choice((default_fn, default_class, default_expr)))
        .map(ExportDecl::Default);

    let specifier = word()
        .then(kw("as").ignore_then(word()).or_not())
        .map(|(local, exported)| ExportSpecifier {
            local: Ident::new(local),
            exported: exported.map(Ident::new),
        });
    let named = specifier
        .separated_by(sym(","))
        .allow_trailing()
        .delimited_by(sym("{"), sym("}"))
        .then(kw("from").ignore_then(string_lit()).or_not())
        .then_ignore(semi())
        .map(|(specifiers, source)| ExportDecl::Named { specifiers, source });
    let all = sym("*")
        .ignore_then(kw("from"))
        .ignore_then(string_lit())
        .then_ignore(semi())
        .map(|source| ExportDecl::All { source });

    kw("export")
        .ignore_then(choice((default, all, named, decl.map(ExportDecl::Decl))))
        .boxed()
}

/// The whole-module parser.
pub(crate) fn program(features: Features) -> impl Parser<char, Program, Error = ParserError> {
    let stmt = statement(features);
    let block = block_of(stmt.clone());
    let expr = expression(features, block.clone());
    let decl = declaration(features, expr.clone(), block.clone());

    let item = choice((
        import_decl(features).map(ModuleItem::Import),
        export_decl(features, expr, decl, block).map(ModuleItem::Export),
        stmt.map(ModuleItem::Stmt),
    ));

    trivia()
        .ignore_then(item.repeated())
        .then_ignore(end())
        .map(|body| Program { body })
}

//! Textual dump of libraries.
//!
//! Produces a stable, source-like rendering used by expectation tests and
//! debug logging. The output is deterministic: members are printed in
//! declaration order and constants are printed structurally.
//!
//! ```text
//! library dart:math;
//! @FfiNative<Double Function(Double)>{nativeName: "Math_sqrt"}
//! external static double _sqrt(double x);
//! ```

use std::fmt::{self, Formatter};

use crate::{
    Constant, ConstantId, DartType, Expr, ExprId, FieldFlags, LibraryId, Member, MemberRef, Name,
    Parent, Program, Stmt, StmtId, StringLookup,
};

/// Render one library to a string.
pub fn print_library(program: &Program, names: &dyn StringLookup, library: LibraryId) -> String {
    LibraryDisplay {
        program,
        names,
        library,
    }
    .to_string()
}

/// Render every library of the program, in order.
pub fn print_program(program: &Program, names: &dyn StringLookup) -> String {
    program
        .library_ids()
        .map(|library| print_library(program, names, library))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `Display` adapter for a library.
pub struct LibraryDisplay<'a> {
    pub program: &'a Program,
    pub names: &'a dyn StringLookup,
    pub library: LibraryId,
}

impl fmt::Display for LibraryDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let printer = Printer {
            program: self.program,
            names: self.names,
        };
        printer.library(f, self.library)
    }
}

struct Printer<'a> {
    program: &'a Program,
    names: &'a dyn StringLookup,
}

impl Printer<'_> {
    fn name(&self, name: Name) -> &str {
        self.names.lookup(name)
    }

    fn library(&self, f: &mut Formatter<'_>, id: LibraryId) -> fmt::Result {
        let library = self.program.library(id);
        writeln!(f, "library {};", self.name(library.import_uri))?;
        for &member in &library.members {
            match member {
                Member::Class(class) => self.class(f, class, 0)?,
                Member::Field(field) => self.field(f, field, 0)?,
                Member::Procedure(procedure) => self.procedure(f, procedure, 0)?,
            }
        }
        Ok(())
    }

    fn class(&self, f: &mut Formatter<'_>, id: crate::ClassId, indent: usize) -> fmt::Result {
        let class = self.program.class(id);
        pad(f, indent)?;
        write!(f, "class {} {{", self.name(class.name))?;
        if class.fields.is_empty() && class.procedures.is_empty() {
            return writeln!(f, "}}");
        }
        writeln!(f)?;
        for &field in &class.fields {
            self.field(f, field, indent + 1)?;
        }
        for &procedure in &class.procedures {
            self.procedure(f, procedure, indent + 1)?;
        }
        pad(f, indent)?;
        writeln!(f, "}}")
    }

    fn annotations(&self, f: &mut Formatter<'_>, annotations: &[ExprId], indent: usize) -> fmt::Result {
        for &annotation in annotations {
            pad(f, indent)?;
            f.write_str("@")?;
            self.expr(f, annotation)?;
            writeln!(f)?;
        }
        Ok(())
    }

    fn field(&self, f: &mut Formatter<'_>, id: crate::FieldId, indent: usize) -> fmt::Result {
        let field = self.program.field(id);
        self.annotations(f, &field.annotations, indent)?;
        pad(f, indent)?;
        if field.flags.contains(FieldFlags::STATIC) {
            f.write_str("static ")?;
        }
        if field.flags.contains(FieldFlags::LATE) {
            f.write_str("late ")?;
        }
        if field.flags.contains(FieldFlags::CONST) {
            f.write_str("const ")?;
        } else if field.flags.contains(FieldFlags::FINAL) {
            f.write_str("final ")?;
        }
        self.dart_type(f, &field.ty)?;
        write!(f, " {}", self.name(field.name))?;
        if let Some(initializer) = field.initializer {
            f.write_str(" = ")?;
            self.expr(f, initializer)?;
        }
        writeln!(f, ";")
    }

    fn procedure(&self, f: &mut Formatter<'_>, id: crate::ProcedureId, indent: usize) -> fmt::Result {
        let procedure = self.program.procedure(id);
        self.annotations(f, &procedure.annotations, indent)?;
        pad(f, indent)?;
        if procedure.is_external() {
            f.write_str("external ")?;
        }
        if procedure.is_static() {
            f.write_str("static ")?;
        }
        self.dart_type(f, &procedure.function.return_type)?;
        write!(f, " {}(", self.name(procedure.name))?;
        for (i, &param) in procedure.function.positional.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let variable = self.program.variable(param);
            self.dart_type(f, &variable.ty)?;
            write!(f, " {}", self.name(variable.name))?;
        }
        f.write_str(")")?;
        match procedure.function.body {
            None => writeln!(f, ";"),
            Some(body) => {
                f.write_str(" ")?;
                match self.program.stmt(body) {
                    Stmt::Block(stmts) => self.block(f, stmts, indent),
                    Stmt::Return(_) | Stmt::Expression(_) => self.block(f, &[body], indent),
                }
            }
        }
    }

    /// `{`, the statements one level deeper, then `}` at `indent`.
    fn block(&self, f: &mut Formatter<'_>, stmts: &[StmtId], indent: usize) -> fmt::Result {
        writeln!(f, "{{")?;
        for &stmt in stmts {
            self.stmt(f, stmt, indent + 1)?;
        }
        pad(f, indent)?;
        writeln!(f, "}}")
    }

    fn stmt(&self, f: &mut Formatter<'_>, id: StmtId, indent: usize) -> fmt::Result {
        pad(f, indent)?;
        match self.program.stmt(id) {
            Stmt::Return(None) => writeln!(f, "return;"),
            Stmt::Return(Some(value)) => {
                f.write_str("return ")?;
                self.expr(f, *value)?;
                writeln!(f, ";")
            }
            Stmt::Expression(expr) => {
                self.expr(f, *expr)?;
                writeln!(f, ";")
            }
            Stmt::Block(stmts) => self.block(f, stmts, indent),
        }
    }

    fn expr(&self, f: &mut Formatter<'_>, id: ExprId) -> fmt::Result {
        match self.program.expr(id) {
            Expr::Constant(constant) => self.constant(f, *constant),
            Expr::StaticGet(member) => self.member_ref(f, *member),
            Expr::StaticInvocation { target, arguments } => {
                self.member_ref(f, MemberRef::Procedure(*target))?;
                self.type_arguments(f, &arguments.types)?;
                self.arguments(f, &arguments.positional)
            }
            Expr::FunctionInvocation {
                receiver,
                arguments,
                ..
            } => {
                self.expr(f, *receiver)?;
                self.type_arguments(f, &arguments.types)?;
                self.arguments(f, &arguments.positional)
            }
            Expr::VariableGet(variable) => {
                f.write_str(self.name(self.program.variable(*variable).name))
            }
            Expr::IntLiteral(value) => write!(f, "{value}"),
            Expr::DoubleLiteral(bits) => write!(f, "{:?}", f64::from_bits(*bits)),
        }
    }

    fn arguments(&self, f: &mut Formatter<'_>, positional: &[ExprId]) -> fmt::Result {
        f.write_str("(")?;
        for (i, &argument) in positional.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            self.expr(f, argument)?;
        }
        f.write_str(")")
    }

    /// Static members of classes are qualified with the class name.
    fn member_ref(&self, f: &mut Formatter<'_>, member: MemberRef) -> fmt::Result {
        let (name, parent) = match member {
            MemberRef::Field(id) => {
                let field = self.program.field(id);
                (field.name, field.parent)
            }
            MemberRef::Procedure(id) => {
                let procedure = self.program.procedure(id);
                (procedure.name, procedure.parent)
            }
        };
        if let Parent::Class(class) = parent {
            write!(f, "{}.", self.name(self.program.class(class).name))?;
        }
        f.write_str(self.name(name))
    }

    fn constant(&self, f: &mut Formatter<'_>, id: ConstantId) -> fmt::Result {
        match self.program.constant(id) {
            Constant::Null => f.write_str("null"),
            Constant::Bool(value) => write!(f, "{value}"),
            Constant::Int(value) => write!(f, "{value}"),
            Constant::Double(bits) => write!(f, "{:?}", f64::from_bits(*bits)),
            Constant::String(value) => write!(f, "{:?}", self.name(*value)),
            Constant::Instance(instance) => {
                f.write_str(self.name(self.program.class(instance.class).name))?;
                self.type_arguments(f, &instance.type_arguments)?;
                f.write_str("{")?;
                for (i, &(field, value)) in instance.field_values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: ", self.name(self.program.field(field).name))?;
                    self.constant(f, value)?;
                }
                f.write_str("}")
            }
        }
    }

    fn type_arguments(&self, f: &mut Formatter<'_>, types: &[DartType]) -> fmt::Result {
        if types.is_empty() {
            return Ok(());
        }
        f.write_str("<")?;
        self.type_list(f, types)?;
        f.write_str(">")
    }

    fn type_list(&self, f: &mut Formatter<'_>, types: &[DartType]) -> fmt::Result {
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            self.dart_type(f, ty)?;
        }
        Ok(())
    }

    fn dart_type(&self, f: &mut Formatter<'_>, ty: &DartType) -> fmt::Result {
        match ty {
            DartType::Dynamic => f.write_str("dynamic"),
            DartType::Void => f.write_str("void"),
            DartType::Never => f.write_str("Never"),
            DartType::Interface(interface) => {
                f.write_str(self.name(self.program.class(interface.class).name))?;
                self.type_arguments(f, &interface.type_arguments)?;
                f.write_str(interface.nullability.suffix())
            }
            DartType::Function(function) => {
                self.dart_type(f, &function.return_type)?;
                f.write_str(" Function(")?;
                self.type_list(f, &function.positional)?;
                f.write_str(")")?;
                f.write_str(function.nullability.suffix())
            }
        }
    }
}

fn pad(f: &mut Formatter<'_>, indent: usize) -> fmt::Result {
    write!(f, "{:width$}", "", width = indent * 2)
}

#[cfg(test)]
mod tests;

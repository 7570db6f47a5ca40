//! Native init routines generated with Cranelift.
//!
//! Each routine has the signature `extern "C" fn(out: *mut u8)` and
//! initializes one shape in place:
//!
//! ```text
//! zeroed shape:       store.i32 0, out+offset   (once per field)
//! constructor shape:  call construct_into(out)
//! ```
//!
//! The typed side (allocating the slot and erasing the result) stays in Rust,
//! see [`ShapeDescriptor::assembler`].

use cranelift_codegen::ir::types::I32;
use cranelift_codegen::ir::{AbiParam, InstBuilder, MemFlags, UserFuncName};
use cranelift_codegen::settings::{self, Configurable};
use cranelift_frontend::{FunctionBuilder, FunctionBuilderContext};
use cranelift_jit::{JITBuilder, JITModule};
use cranelift_module::{Linkage, Module};

use crate::error::{BenchError, Result};
use crate::shape::{DefaultPath, InitRoutine, ShapeDescriptor};

const ROUTINE_NAME: &str = "init_shape";
const CONSTRUCTOR_SYMBOL: &str = "construct_into";

/// A generated routine. Owns the JIT module (code memory) and holds the
/// entry point.
pub struct GeneratedRoutine {
    _module: JITModule,
    entry: InitRoutine,
    path: DefaultPath,
}

// SAFETY: JITModule owns the code memory and is never mutated after
// finalization. entry is valid for the module's lifetime.
unsafe impl Send for GeneratedRoutine {}
unsafe impl Sync for GeneratedRoutine {}

impl GeneratedRoutine {
    #[inline]
    pub fn entry(&self) -> InitRoutine {
        self.entry
    }

    /// Which default path the routine encodes
    pub fn path(&self) -> DefaultPath {
        self.path
    }
}

fn codegen<E: std::fmt::Display>(stage: &'static str) -> impl Fn(E) -> BenchError {
    move |e| BenchError::Codegen(format!("{stage}: {e}"))
}

fn make_jit_module(constructor: Option<InitRoutine>) -> Result<JITModule> {
    let mut flag_builder = settings::builder();
    flag_builder
        .set("use_colocated_libcalls", "false")
        .map_err(codegen("settings"))?;
    flag_builder
        .set("is_pic", "false")
        .map_err(codegen("settings"))?;
    let isa_builder = cranelift_native::builder().map_err(codegen("isa builder"))?;
    let isa = isa_builder
        .finish(settings::Flags::new(flag_builder))
        .map_err(codegen("isa finish"))?;

    let mut builder = JITBuilder::with_isa(isa, cranelift_module::default_libcall_names());
    if let Some(thunk) = constructor {
        builder.symbol(CONSTRUCTOR_SYMBOL, thunk as *const u8);
    }
    Ok(JITModule::new(builder))
}

/// Generate the routine producing a default instance of `descriptor`.
pub fn generate(descriptor: &ShapeDescriptor) -> Result<GeneratedRoutine> {
    let path = descriptor.default_path()?;
    let constructor = match path {
        DefaultPath::Constructor => Some(descriptor.construct_into().ok_or(
            BenchError::ConstructionUnavailable {
                shape: descriptor.name(),
            },
        )?),
        DefaultPath::Zeroed => None,
    };

    let mut module = make_jit_module(constructor)?;
    let ptr_type = module.target_config().pointer_type();

    let mut sig = module.make_signature();
    sig.params.push(AbiParam::new(ptr_type));

    let func_id = module
        .declare_function(ROUTINE_NAME, Linkage::Local, &sig)
        .map_err(codegen("declare"))?;
    let callee = match path {
        DefaultPath::Constructor => Some(
            module
                .declare_function(CONSTRUCTOR_SYMBOL, Linkage::Import, &sig)
                .map_err(codegen("declare import"))?,
        ),
        DefaultPath::Zeroed => None,
    };

    let mut ctx = module.make_context();
    ctx.func.signature = sig;
    ctx.func.name = UserFuncName::user(0, func_id.as_u32());
    let mut func_ctx = FunctionBuilderContext::new();

    {
        let mut builder = FunctionBuilder::new(&mut ctx.func, &mut func_ctx);
        let entry = builder.create_block();
        builder.append_block_params_for_function_params(entry);
        builder.switch_to_block(entry);
        builder.seal_block(entry);

        let out = builder.block_params(entry)[0];

        match callee {
            Some(callee) => {
                let local = module.declare_func_in_func(callee, builder.func);
                builder.ins().call(local, &[out]);
            }
            None => {
                let zero = builder.ins().iconst(I32, 0);
                for field in descriptor.fields() {
                    builder
                        .ins()
                        .store(MemFlags::trusted(), zero, out, field.offset as i32);
                }
            }
        }

        builder.ins().return_(&[]);
        builder.finalize();
    }

    module
        .define_function(func_id, &mut ctx)
        .map_err(codegen("define"))?;
    module.clear_context(&mut ctx);
    module
        .finalize_definitions()
        .map_err(codegen("finalize"))?;

    let code = module.get_finalized_function(func_id);
    // SAFETY: the function was declared with a single pointer parameter and
    // no return value using the platform's default (C) calling convention.
    let entry = unsafe { std::mem::transmute::<*const u8, InitRoutine>(code) };

    Ok(GeneratedRoutine {
        _module: module,
        entry,
        path,
    })
}

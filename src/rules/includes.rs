//! Built-in include-filename table.
//!
//! Main headers (the ones that satisfy the runtime-header requirement or
//! pull in a whole API family) are tagged `IncludeMainHeader` and
//! deduplicated per category; everything else is a plain substitution.
//! An empty HIP name deletes the directive.

use super::ApiCategory::*;
use super::ConvKind::{Include, IncludeMainHeader};
use super::SupportDegree::*;
use super::{entry, RuleEntry};
use std::borrow::Cow;
use std::collections::HashMap;

type Row = (&'static str, RuleEntry);

#[rustfmt::skip]
const INCLUDES: &[Row] = &[
    ("cuda.h",                  entry("hip/hip_runtime.h", "", IncludeMainHeader, Driver, Supported)),
    ("cuda_runtime.h",          entry("hip/hip_runtime.h", "", IncludeMainHeader, Runtime, Supported)),
    ("cuda_runtime_api.h",      entry("hip/hip_runtime_api.h", "", Include, Runtime, Supported)),
    ("channel_descriptor.h",    entry("hip/channel_descriptor.h", "", Include, Runtime, Supported)),
    ("device_functions.h",      entry("hip/device_functions.h", "", Include, Runtime, Supported)),
    ("driver_types.h",          entry("hip/driver_types.h", "", Include, Runtime, Supported)),
    ("vector_types.h",          entry("hip/hip_vector_types.h", "", Include, Runtime, Supported)),
    ("texture_types.h",         entry("hip/hip_texture_types.h", "", Include, Runtime, Supported)),
    ("cooperative_groups.h",    entry("hip/hip_cooperative_groups.h", "", Include, Runtime, Supported)),
    ("math_constants.h",        entry("hip/hip_math_constants.h", "", Include, Runtime, Supported)),
    // Compiler-supplied on the HIP side; the directive is deleted.
    ("device_launch_parameters.h", entry("", "", Include, Runtime, Supported)),
    ("texture_fetch_functions.h",  entry("", "", Include, Runtime, Supported)),
    // No HIP equivalent exists.
    ("cuda_profiler_api.h",     entry("", "", Include, Runtime, Unsupported)),
    ("nvml.h",                  entry("", "", Include, Runtime, Unsupported)),

    ("cublas.h",    entry("hipblas.h", "rocblas.h", IncludeMainHeader, Blas, Supported)),
    ("cublas_v2.h", entry("hipblas.h", "rocblas.h", IncludeMainHeader, Blas, Supported)),

    ("curand.h",        entry("hiprand.h", "rocrand.h", IncludeMainHeader, Rand, Supported)),
    ("curand_kernel.h", entry("hiprand_kernel.h", "rocrand_kernel.h", IncludeMainHeader, Rand, Supported)),
    // Device-side pieces all collapse into the kernel header.
    ("curand_uniform.h",  entry("hiprand_kernel.h", "rocrand_kernel.h", Include, Rand, Supported)),
    ("curand_normal.h",   entry("hiprand_kernel.h", "rocrand_kernel.h", Include, Rand, Supported)),
    ("curand_discrete.h", entry("hiprand_kernel.h", "rocrand_kernel.h", Include, Rand, Supported)),

    ("cudnn.h",  entry("hipDNN.h", "miopen/miopen.h", IncludeMainHeader, Dnn, Supported)),

    ("cufft.h",   entry("hipfft.h", "", IncludeMainHeader, Fft, Supported)),
    ("cufftXt.h", entry("hipfftXt.h", "", Include, Fft, Supported)),

    ("cuComplex.h", entry("hip/hip_complex.h", "", IncludeMainHeader, Complex, Supported)),

    ("cusparse.h",    entry("hipsparse.h", "rocsparse.h", IncludeMainHeader, Sparse, Supported)),
    ("cusparse_v2.h", entry("hipsparse.h", "rocsparse.h", IncludeMainHeader, Sparse, Supported)),
];

pub(super) fn table() -> HashMap<Cow<'static, str>, RuleEntry> {
    INCLUDES
        .iter()
        .map(|(name, e)| (Cow::Borrowed(*name), e.clone()))
        .collect()
}

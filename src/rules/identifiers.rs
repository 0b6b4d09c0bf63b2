//! Built-in identifier rename table.
//!
//! A row maps one CUDA identifier to its HIP spelling and, where the ROC
//! libraries use a different name, the ROC spelling. Sourced from the
//! public CUDA/HIP porting tables; only names the translator has been
//! exercised against are listed, user TOML rules cover the rest.

use super::ApiCategory::*;
use super::ConvKind::Identifier;
use super::SupportDegree::*;
use super::{entry, RuleEntry};
use std::borrow::Cow;
use std::collections::HashMap;

type Row = (&'static str, RuleEntry);

#[rustfmt::skip]
const IDENTIFIERS: &[Row] = &[
    // Runtime: memory management
    ("cudaMalloc",            entry("hipMalloc", "", Identifier, Runtime, Supported)),
    ("cudaMallocHost",        entry("hipHostMalloc", "", Identifier, Runtime, Supported)),
    ("cudaMallocManaged",     entry("hipMallocManaged", "", Identifier, Runtime, Supported)),
    ("cudaMallocPitch",       entry("hipMallocPitch", "", Identifier, Runtime, Supported)),
    ("cudaFree",              entry("hipFree", "", Identifier, Runtime, Supported)),
    ("cudaFreeHost",          entry("hipHostFree", "", Identifier, Runtime, Supported)),
    ("cudaMemcpy",            entry("hipMemcpy", "", Identifier, Runtime, Supported)),
    ("cudaMemcpyAsync",       entry("hipMemcpyAsync", "", Identifier, Runtime, Supported)),
    ("cudaMemcpy2D",          entry("hipMemcpy2D", "", Identifier, Runtime, Supported)),
    ("cudaMemcpyToSymbol",    entry("hipMemcpyToSymbol", "", Identifier, Runtime, Supported)),
    ("cudaMemset",            entry("hipMemset", "", Identifier, Runtime, Supported)),
    ("cudaMemsetAsync",       entry("hipMemsetAsync", "", Identifier, Runtime, Supported)),
    ("cudaMemGetInfo",        entry("hipMemGetInfo", "", Identifier, Runtime, Supported)),
    ("cudaHostRegister",      entry("hipHostRegister", "", Identifier, Runtime, Supported)),
    ("cudaHostUnregister",    entry("hipHostUnregister", "", Identifier, Runtime, Supported)),
    ("cudaHostGetDevicePointer", entry("hipHostGetDevicePointer", "", Identifier, Runtime, Supported)),
    ("cudaHostAllocDefault",  entry("hipHostMallocDefault", "", Identifier, Runtime, Supported)),
    ("cudaHostAllocMapped",   entry("hipHostMallocMapped", "", Identifier, Runtime, Supported)),

    // Runtime: device management
    ("cudaDeviceSynchronize", entry("hipDeviceSynchronize", "", Identifier, Runtime, Supported)),
    ("cudaDeviceReset",       entry("hipDeviceReset", "", Identifier, Runtime, Supported)),
    ("cudaSetDevice",         entry("hipSetDevice", "", Identifier, Runtime, Supported)),
    ("cudaGetDevice",         entry("hipGetDevice", "", Identifier, Runtime, Supported)),
    ("cudaGetDeviceCount",    entry("hipGetDeviceCount", "", Identifier, Runtime, Supported)),
    ("cudaGetDeviceProperties", entry("hipGetDeviceProperties", "", Identifier, Runtime, Supported)),
    ("cudaDeviceGetAttribute", entry("hipDeviceGetAttribute", "", Identifier, Runtime, Supported)),
    ("cudaChooseDevice",      entry("hipChooseDevice", "", Identifier, Runtime, Supported)),
    ("cudaDeviceProp",        entry("hipDeviceProp_t", "", Identifier, Runtime, Supported)),
    ("cudaThreadSynchronize", entry("hipDeviceSynchronize", "", Identifier, Runtime, Deprecated)),
    ("cudaThreadExit",        entry("hipDeviceReset", "", Identifier, Runtime, Deprecated)),

    // Runtime: error handling
    ("cudaError_t",           entry("hipError_t", "", Identifier, Runtime, Supported)),
    ("cudaError",             entry("hipError_t", "", Identifier, Runtime, Supported)),
    ("cudaSuccess",           entry("hipSuccess", "", Identifier, Runtime, Supported)),
    ("cudaErrorMemoryAllocation", entry("hipErrorOutOfMemory", "", Identifier, Runtime, Supported)),
    ("cudaErrorInvalidValue", entry("hipErrorInvalidValue", "", Identifier, Runtime, Supported)),
    ("cudaErrorInvalidDevice", entry("hipErrorInvalidDevice", "", Identifier, Runtime, Supported)),
    ("cudaGetLastError",      entry("hipGetLastError", "", Identifier, Runtime, Supported)),
    ("cudaPeekAtLastError",   entry("hipPeekAtLastError", "", Identifier, Runtime, Supported)),
    ("cudaGetErrorString",    entry("hipGetErrorString", "", Identifier, Runtime, Supported)),
    ("cudaGetErrorName",      entry("hipGetErrorName", "", Identifier, Runtime, Supported)),

    // Runtime: memcpy kinds
    ("cudaMemcpyKind",          entry("hipMemcpyKind", "", Identifier, Runtime, Supported)),
    ("cudaMemcpyHostToHost",    entry("hipMemcpyHostToHost", "", Identifier, Runtime, Supported)),
    ("cudaMemcpyHostToDevice",  entry("hipMemcpyHostToDevice", "", Identifier, Runtime, Supported)),
    ("cudaMemcpyDeviceToHost",  entry("hipMemcpyDeviceToHost", "", Identifier, Runtime, Supported)),
    ("cudaMemcpyDeviceToDevice", entry("hipMemcpyDeviceToDevice", "", Identifier, Runtime, Supported)),
    ("cudaMemcpyDefault",       entry("hipMemcpyDefault", "", Identifier, Runtime, Supported)),

    // Runtime: streams
    ("cudaStream_t",            entry("hipStream_t", "", Identifier, Runtime, Supported)),
    ("cudaStreamCreate",        entry("hipStreamCreate", "", Identifier, Runtime, Supported)),
    ("cudaStreamCreateWithFlags", entry("hipStreamCreateWithFlags", "", Identifier, Runtime, Supported)),
    ("cudaStreamDestroy",       entry("hipStreamDestroy", "", Identifier, Runtime, Supported)),
    ("cudaStreamSynchronize",   entry("hipStreamSynchronize", "", Identifier, Runtime, Supported)),
    ("cudaStreamWaitEvent",     entry("hipStreamWaitEvent", "", Identifier, Runtime, Supported)),
    ("cudaStreamQuery",         entry("hipStreamQuery", "", Identifier, Runtime, Supported)),
    ("cudaStreamDefault",       entry("hipStreamDefault", "", Identifier, Runtime, Supported)),
    ("cudaStreamNonBlocking",   entry("hipStreamNonBlocking", "", Identifier, Runtime, Supported)),

    // Runtime: events
    ("cudaEvent_t",             entry("hipEvent_t", "", Identifier, Runtime, Supported)),
    ("cudaEventCreate",         entry("hipEventCreate", "", Identifier, Runtime, Supported)),
    ("cudaEventCreateWithFlags", entry("hipEventCreateWithFlags", "", Identifier, Runtime, Supported)),
    ("cudaEventRecord",         entry("hipEventRecord", "", Identifier, Runtime, Supported)),
    ("cudaEventSynchronize",    entry("hipEventSynchronize", "", Identifier, Runtime, Supported)),
    ("cudaEventElapsedTime",    entry("hipEventElapsedTime", "", Identifier, Runtime, Supported)),
    ("cudaEventQuery",          entry("hipEventQuery", "", Identifier, Runtime, Supported)),
    ("cudaEventDestroy",        entry("hipEventDestroy", "", Identifier, Runtime, Supported)),
    ("cudaEventDisableTiming",  entry("hipEventDisableTiming", "", Identifier, Runtime, Supported)),

    // Runtime: occupancy and function attributes
    ("cudaFuncAttributes",      entry("hipFuncAttributes", "", Identifier, Runtime, Supported)),
    ("cudaFuncGetAttributes",   entry("hipFuncGetAttributes", "", Identifier, Runtime, Supported)),
    ("cudaOccupancyMaxActiveBlocksPerMultiprocessor",
        entry("hipOccupancyMaxActiveBlocksPerMultiprocessor", "", Identifier, Runtime, Supported)),

    // Runtime: graphs (not covered by the target dialect)
    ("cudaGraph_t",             entry("", "", Identifier, Runtime, Unsupported)),
    ("cudaGraphExec_t",         entry("", "", Identifier, Runtime, Unsupported)),
    ("cudaGraphLaunch",         entry("", "", Identifier, Runtime, Unsupported)),
    ("cudaStreamBeginCapture",  entry("", "", Identifier, Runtime, Unsupported)),
    ("cudaLaunchCooperativeKernelMultiDevice",
        entry("", "", Identifier, Runtime, Unsupported)),

    // Driver API
    ("cuInit",            entry("hipInit", "", Identifier, Driver, Supported)),
    ("CUdevice",          entry("hipDevice_t", "", Identifier, Driver, Supported)),
    ("CUcontext",         entry("hipCtx_t", "", Identifier, Driver, Supported)),
    ("CUmodule",          entry("hipModule_t", "", Identifier, Driver, Supported)),
    ("CUfunction",        entry("hipFunction_t", "", Identifier, Driver, Supported)),
    ("CUstream",          entry("hipStream_t", "", Identifier, Driver, Supported)),
    ("CUresult",          entry("hipError_t", "", Identifier, Driver, Supported)),
    ("CUDA_SUCCESS",      entry("hipSuccess", "", Identifier, Driver, Supported)),
    ("cuDeviceGet",       entry("hipDeviceGet", "", Identifier, Driver, Supported)),
    ("cuDeviceGetCount",  entry("hipGetDeviceCount", "", Identifier, Driver, Supported)),
    ("cuDeviceGetName",   entry("hipDeviceGetName", "", Identifier, Driver, Supported)),
    ("cuCtxCreate",       entry("hipCtxCreate", "", Identifier, Driver, Supported)),
    ("cuCtxDestroy",      entry("hipCtxDestroy", "", Identifier, Driver, Supported)),
    ("cuModuleLoad",      entry("hipModuleLoad", "", Identifier, Driver, Supported)),
    ("cuModuleGetFunction", entry("hipModuleGetFunction", "", Identifier, Driver, Supported)),
    ("cuLaunchKernel",    entry("hipModuleLaunchKernel", "", Identifier, Driver, Supported)),
    ("cuMemAlloc",        entry("hipMalloc", "", Identifier, Driver, Supported)),
    ("cuMemFree",         entry("hipFree", "", Identifier, Driver, Supported)),
    ("cuMemcpyHtoD",      entry("hipMemcpyHtoD", "", Identifier, Driver, Supported)),
    ("cuMemcpyDtoH",      entry("hipMemcpyDtoH", "", Identifier, Driver, Supported)),
    ("cuProfilerStart",   entry("", "", Identifier, Driver, Unsupported)),
    ("cuProfilerStop",    entry("", "", Identifier, Driver, Unsupported)),

    // BLAS
    ("cublasHandle_t",    entry("hipblasHandle_t", "rocblas_handle", Identifier, Blas, Supported)),
    ("cublasStatus_t",    entry("hipblasStatus_t", "rocblas_status", Identifier, Blas, Supported)),
    ("cublasOperation_t", entry("hipblasOperation_t", "rocblas_operation", Identifier, Blas, Supported)),
    ("CUBLAS_OP_N",       entry("HIPBLAS_OP_N", "rocblas_operation_none", Identifier, Blas, Supported)),
    ("CUBLAS_OP_T",       entry("HIPBLAS_OP_T", "rocblas_operation_transpose", Identifier, Blas, Supported)),
    ("CUBLAS_STATUS_SUCCESS", entry("HIPBLAS_STATUS_SUCCESS", "rocblas_status_success", Identifier, Blas, Supported)),
    ("cublasCreate",      entry("hipblasCreate", "rocblas_create_handle", Identifier, Blas, Supported)),
    ("cublasDestroy",     entry("hipblasDestroy", "rocblas_destroy_handle", Identifier, Blas, Supported)),
    ("cublasSetStream",   entry("hipblasSetStream", "rocblas_set_stream", Identifier, Blas, Supported)),
    ("cublasSgemm",       entry("hipblasSgemm", "rocblas_sgemm", Identifier, Blas, Supported)),
    ("cublasDgemm",       entry("hipblasDgemm", "rocblas_dgemm", Identifier, Blas, Supported)),
    ("cublasSgemmBatched", entry("hipblasSgemmBatched", "rocblas_sgemm_batched", Identifier, Blas, Supported)),
    ("cublasSaxpy",       entry("hipblasSaxpy", "rocblas_saxpy", Identifier, Blas, Supported)),
    ("cublasSscal",       entry("hipblasSscal", "rocblas_sscal", Identifier, Blas, Supported)),
    ("cublasSdot",        entry("hipblasSdot", "rocblas_sdot", Identifier, Blas, Supported)),
    ("cublasXtSgemm",     entry("", "", Identifier, Blas, Unsupported)),

    // RAND
    ("curandState",       entry("hiprandState", "rocrand_state_xorwow", Identifier, Rand, Supported)),
    ("curandState_t",     entry("hiprandState_t", "rocrand_state_xorwow", Identifier, Rand, Supported)),
    ("curandGenerator_t", entry("hiprandGenerator_t", "rocrand_generator", Identifier, Rand, Supported)),
    ("curandStatus_t",    entry("hiprandStatus_t", "rocrand_status", Identifier, Rand, Supported)),
    ("CURAND_STATUS_SUCCESS", entry("HIPRAND_STATUS_SUCCESS", "ROCRAND_STATUS_SUCCESS", Identifier, Rand, Supported)),
    ("CURAND_RNG_PSEUDO_DEFAULT", entry("HIPRAND_RNG_PSEUDO_DEFAULT", "ROCRAND_RNG_PSEUDO_DEFAULT", Identifier, Rand, Supported)),
    ("curandCreateGenerator", entry("hiprandCreateGenerator", "rocrand_create_generator", Identifier, Rand, Supported)),
    ("curandDestroyGenerator", entry("hiprandDestroyGenerator", "rocrand_destroy_generator", Identifier, Rand, Supported)),
    ("curandSetPseudoRandomGeneratorSeed",
        entry("hiprandSetPseudoRandomGeneratorSeed", "rocrand_set_seed", Identifier, Rand, Supported)),
    ("curandGenerateUniform", entry("hiprandGenerateUniform", "rocrand_generate_uniform", Identifier, Rand, Supported)),
    ("curandGenerateNormal",  entry("hiprandGenerateNormal", "rocrand_generate_normal", Identifier, Rand, Supported)),

    // DNN
    ("cudnnHandle_t",     entry("hipdnnHandle_t", "miopenHandle_t", Identifier, Dnn, Supported)),
    ("cudnnStatus_t",     entry("hipdnnStatus_t", "miopenStatus_t", Identifier, Dnn, Supported)),
    ("CUDNN_STATUS_SUCCESS", entry("HIPDNN_STATUS_SUCCESS", "miopenStatusSuccess", Identifier, Dnn, Supported)),
    ("cudnnCreate",       entry("hipdnnCreate", "miopenCreate", Identifier, Dnn, Supported)),
    ("cudnnDestroy",      entry("hipdnnDestroy", "miopenDestroy", Identifier, Dnn, Supported)),
    ("cudnnTensorDescriptor_t", entry("hipdnnTensorDescriptor_t", "miopenTensorDescriptor_t", Identifier, Dnn, Supported)),
    ("cudnnCreateTensorDescriptor",
        entry("hipdnnCreateTensorDescriptor", "miopenCreateTensorDescriptor", Identifier, Dnn, Supported)),
    ("cudnnConvolutionForward",
        entry("hipdnnConvolutionForward", "miopenConvolutionForward", Identifier, Dnn, Supported)),
    ("cudnnRNNForwardInference", entry("", "", Identifier, Dnn, Unsupported)),

    // FFT
    ("cufftHandle",   entry("hipfftHandle", "", Identifier, Fft, Supported)),
    ("cufftComplex",  entry("hipfftComplex", "", Identifier, Fft, Supported)),
    ("cufftResult",   entry("hipfftResult", "", Identifier, Fft, Supported)),
    ("CUFFT_SUCCESS", entry("HIPFFT_SUCCESS", "", Identifier, Fft, Supported)),
    ("CUFFT_FORWARD", entry("HIPFFT_FORWARD", "", Identifier, Fft, Supported)),
    ("CUFFT_INVERSE", entry("HIPFFT_BACKWARD", "", Identifier, Fft, Supported)),
    ("cufftPlan1d",   entry("hipfftPlan1d", "", Identifier, Fft, Supported)),
    ("cufftPlan2d",   entry("hipfftPlan2d", "", Identifier, Fft, Supported)),
    ("cufftPlanMany", entry("hipfftPlanMany", "", Identifier, Fft, Supported)),
    ("cufftExecC2C",  entry("hipfftExecC2C", "", Identifier, Fft, Supported)),
    ("cufftExecR2C",  entry("hipfftExecR2C", "", Identifier, Fft, Supported)),
    ("cufftDestroy",  entry("hipfftDestroy", "", Identifier, Fft, Supported)),

    // Complex numbers
    ("cuComplex",           entry("hipComplex", "", Identifier, Complex, Supported)),
    ("cuFloatComplex",      entry("hipFloatComplex", "", Identifier, Complex, Supported)),
    ("cuDoubleComplex",     entry("hipDoubleComplex", "", Identifier, Complex, Supported)),
    ("make_cuFloatComplex", entry("make_hipFloatComplex", "", Identifier, Complex, Supported)),
    ("make_cuDoubleComplex", entry("make_hipDoubleComplex", "", Identifier, Complex, Supported)),
    ("cuCrealf",            entry("hipCrealf", "", Identifier, Complex, Supported)),
    ("cuCimagf",            entry("hipCimagf", "", Identifier, Complex, Supported)),
    ("cuCaddf",             entry("hipCaddf", "", Identifier, Complex, Supported)),
    ("cuCmulf",             entry("hipCmulf", "", Identifier, Complex, Supported)),
    ("cuCabsf",             entry("hipCabsf", "", Identifier, Complex, Supported)),

    // Sparse
    ("cusparseHandle_t",   entry("hipsparseHandle_t", "rocsparse_handle", Identifier, Sparse, Supported)),
    ("cusparseStatus_t",   entry("hipsparseStatus_t", "rocsparse_status", Identifier, Sparse, Supported)),
    ("CUSPARSE_STATUS_SUCCESS",
        entry("HIPSPARSE_STATUS_SUCCESS", "rocsparse_status_success", Identifier, Sparse, Supported)),
    ("cusparseCreate",     entry("hipsparseCreate", "rocsparse_create_handle", Identifier, Sparse, Supported)),
    ("cusparseDestroy",    entry("hipsparseDestroy", "rocsparse_destroy_handle", Identifier, Sparse, Supported)),
    ("cusparseMatDescr_t", entry("hipsparseMatDescr_t", "rocsparse_mat_descr", Identifier, Sparse, Supported)),
    ("cusparseScsrmv",     entry("hipsparseScsrmv", "rocsparse_scsrmv", Identifier, Sparse, Deprecated)),
];

pub(super) fn table() -> HashMap<Cow<'static, str>, RuleEntry> {
    IDENTIFIERS
        .iter()
        .map(|(name, e)| (Cow::Borrowed(*name), e.clone()))
        .collect()
}

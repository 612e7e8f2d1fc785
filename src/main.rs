//! Driver: validate the model against its reference fixtures, then classify
//! the target photograph and report the results.

use std::path::Path;
use std::process;
use std::time::Instant;

use tracing_subscriber::EnvFilter;

use resnet_classify::{
    argmax, check_assets, image_to_array, postprocess, preprocess, top_k, validate, ClassifyError,
    Engine, ExecutionBackend, FixtureSet, Labels, Result, IMAGE_FILE, LABELS_FILE, MODEL_FILE,
    TEST_DATA_BASE, TEST_DATA_COUNT,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    // Fail before any numeric work when the downloaded assets are absent.
    if let Err(err) = check_assets(Path::new(LABELS_FILE), Path::new(TEST_DATA_BASE)) {
        eprintln!("{}", err);
        eprintln!("Run fetch-resnet to download the model, labels and test data.");
        process::exit(1);
    }

    let fixtures = FixtureSet::load(TEST_DATA_BASE, TEST_DATA_COUNT)?;
    println!("Loaded {} inputs successfully.", fixtures.len());
    println!(
        "Loaded {} reference outputs successfully.",
        fixtures.reference_outputs.len()
    );

    #[cfg(feature = "cuda")]
    let backend = ExecutionBackend::Cuda(0);
    #[cfg(not(feature = "cuda"))]
    let backend = ExecutionBackend::Cpu;

    let mut engine = Engine::builder(MODEL_FILE).with_backend(backend).build()?;
    println!("Input Name: {}", engine.input_name());

    let outputs = validate(&mut engine, &fixtures)?;
    println!("Predicted {} results.", outputs.len());
    println!("ONNX Runtime outputs are similar to reference outputs!");

    let labels = Labels::from_file(LABELS_FILE)?;
    let image = image::open(IMAGE_FILE)?;
    println!("Image size: {}x{}", image.width(), image.height());

    let input = preprocess(image_to_array(&image).view());

    let start = Instant::now();
    let raw = engine.run(input.into_dyn())?;
    let elapsed = start.elapsed();

    let probabilities = postprocess(&raw);
    let top = argmax(&probabilities).ok_or(ClassifyError::EmptyOutput)?;
    let top5 = top_k(&probabilities, 5);

    println!("========================================");
    println!(
        "Final top prediction is: {}",
        labels.get(top).unwrap_or("<unknown class>")
    );
    println!("========================================");
    println!("Inference time: {:.2} ms", elapsed.as_secs_f64() * 1000.0);
    println!("========================================");
    println!("============ Top 5 labels are: ============================");
    for class in top5 {
        println!("{}", labels.get(class).unwrap_or("<unknown class>"));
    }
    println!("===========================================================");

    Ok(())
}

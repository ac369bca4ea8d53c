use std::io::{self, Write};

use jdoc_config::OutputFormat;
use jdoc_model::{ClassModel, ClassRegistry};

/// A consumer of the final registry.
pub trait ModelOutput {
    fn write(&self, registry: &ClassRegistry, out: &mut dyn Write) -> io::Result<()>;
}

/// The whole registry as one JSON object keyed by fully qualified name.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonOutput {
    pub pretty: bool,
}

impl ModelOutput for JsonOutput {
    fn write(&self, registry: &ClassRegistry, out: &mut dyn Write) -> io::Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *out, registry)?;
        } else {
            serde_json::to_writer(&mut *out, registry)?;
        }
        writeln!(out)
    }
}

/// Body-free declarations: each class header followed by its members.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryOutput;

impl SummaryOutput {
    fn write_class(model: &ClassModel, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{model} {{")?;
        for constant in model.constants() {
            writeln!(out, "    {constant};")?;
        }
        for field in model.fields() {
            writeln!(out, "    {field};")?;
        }
        for ctor in model.constructors() {
            writeln!(out, "    {};", ctor.display(model.simple_name()))?;
        }
        for method in model.methods() {
            writeln!(out, "    {method};")?;
        }
        writeln!(out, "}}")
    }
}

impl ModelOutput for SummaryOutput {
    fn write(&self, registry: &ClassRegistry, out: &mut dyn Write) -> io::Result<()> {
        for (idx, (_, model)) in registry.iter().enumerate() {
            if idx > 0 {
                writeln!(out)?;
            }
            Self::write_class(model, out)?;
        }
        Ok(())
    }
}

pub fn output_for(format: OutputFormat) -> Box<dyn ModelOutput> {
    match format {
        OutputFormat::Json => Box::new(JsonOutput { pretty: true }),
        OutputFormat::Summary => Box::new(SummaryOutput),
    }
}

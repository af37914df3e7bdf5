use super::ResponseWriter;
use crate::{
    encodings::VariableSpace,
    koa::{KoaAutomaton, LabelType},
};
use anyhow::{Context, Result};
use std::io::Write;

/// A writer for the results of identification problems, in a human readable text format.
///
/// More precisely, the results are written this way:
///   * absence of automaton: `NO`
///   * automaton: `YES`, followed by one line per edge (like `src -> a_1` or `b_2 -> snk`)
///   * model: one line per edge variable, made of the variable, the edge and its value (`true`, `false` or `unassigned`)
#[derive(Default)]
pub struct TextWriter;

impl<T> ResponseWriter<T> for TextWriter
where
    T: LabelType,
{
    fn write_no_automaton(&self, writer: &mut dyn Write) -> Result<()> {
        super::specs::write_no_automaton(writer)
    }

    fn write_automaton(&self, writer: &mut dyn Write, automaton: &KoaAutomaton<T>) -> Result<()> {
        let context = "while writing an automaton";
        writeln!(writer, "YES").context(context)?;
        automaton
            .iter_edges()
            .try_for_each(|e| writeln!(writer, "{}", automaton.edge_name(e)).context(context))?;
        writer.flush().context(context)
    }

    fn write_model(
        &self,
        writer: &mut dyn Write,
        space: &VariableSpace,
        automaton: &KoaAutomaton<T>,
    ) -> Result<()> {
        let context = "while writing a model";
        for (i, e) in space.edges().enumerate() {
            let value = match automaton.edge_value(&e) {
                Some(true) => "true",
                Some(false) => "false",
                None => "unassigned",
            };
            writeln!(writer, "{} {} {}", i + 1, automaton.edge_name(&e), value).context(context)?;
        }
        writer.flush().context(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encodings::Edge, koa::{Alphabet, Position}};
    use std::io::BufWriter;

    fn sample_automaton(alphabet: &Alphabet<char>) -> KoaAutomaton<char> {
        let a = Position::Symbol(1);
        KoaAutomaton::new(
            alphabet,
            vec![
                Edge::new(a, 1, Position::Sink, 0),
                Edge::new(Position::Source, 0, a, 1),
            ],
        )
    }

    #[test]
    fn test_write_automaton() {
        let alphabet = Alphabet::new_with_labels(&['a']);
        let mut buffer = BufWriter::new(Vec::new());
        TextWriter
            .write_automaton(&mut buffer, &sample_automaton(&alphabet))
            .unwrap();
        assert_eq!(
            "YES\nsrc -> a_1\na_1 -> snk\n",
            String::from_utf8(buffer.into_inner().unwrap()).unwrap()
        );
    }

    #[test]
    fn test_write_no_automaton() {
        let mut buffer = BufWriter::new(Vec::new());
        ResponseWriter::<char>::write_no_automaton(&TextWriter, &mut buffer).unwrap();
        assert_eq!(
            "NO\n",
            String::from_utf8(buffer.into_inner().unwrap()).unwrap()
        );
    }

    #[test]
    fn test_write_model() {
        let alphabet = Alphabet::new_with_labels(&['a']);
        let space = VariableSpace::new(1, 1).unwrap();
        let mut buffer = BufWriter::new(Vec::new());
        TextWriter
            .write_model(&mut buffer, &space, &sample_automaton(&alphabet))
            .unwrap();
        assert_eq!(
            "1 src -> snk false\n2 src -> a_1 true\n3 a_1 -> a_1 false\n4 a_1 -> snk true\n",
            String::from_utf8(buffer.into_inner().unwrap()).unwrap()
        );
    }
}

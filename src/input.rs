use crate::market::Market;
use crate::solution::{UnsignedInt, Value};
use anyhow::{anyhow, ensure, Context, Result};
use std::str::FromStr;

/// Parses a market from text.
///
/// Two layouts are accepted, both with comma separated numbers and blank lines ignored:
///
/// ```text
/// 2            2 0,0
/// 0,0          10,9
/// 10,9         10,1
/// 10,1
/// ```
///
/// The first line holds `n`, optionally followed by the price vector. The price vector goes on the
/// second line otherwise. The remaining lines are the valuation rows in buyer order.
pub fn parse_market<I, V>(text: &str) -> Result<Market<I, V>>
where
    I: UnsignedInt,
    V: Value + FromStr,
    <V as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (header_no, header) = lines.next().ok_or_else(|| anyhow!("market input is empty"))?;
    let mut fields = header.split_whitespace();
    let num_field = fields.next().unwrap_or_default();
    let num: usize = num_field
        .parse()
        .with_context(|| format!("line {}: invalid market size {:?}", header_no, num_field))?;

    let prices = if let Some(price_field) = fields.next() {
        ensure!(
            fields.next().is_none(),
            "line {}: expected the market size and the price vector only",
            header_no
        );
        parse_row(price_field).with_context(|| format!("line {}: invalid price vector", header_no))?
    } else {
        let (line_no, line) = lines
            .next()
            .ok_or_else(|| anyhow!("line {}: price vector is missing", header_no + 1))?;
        parse_row(line).with_context(|| format!("line {}: invalid price vector", line_no))?
    };

    let valuations = lines
        .map(|(line_no, line)| {
            parse_row(line).with_context(|| format!("line {}: invalid valuation row", line_no))
        })
        .collect::<Result<Vec<Vec<V>>>>()?;

    Ok(Market::new(num, prices, valuations)?)
}

fn parse_row<V>(line: &str) -> Result<Vec<V>>
where
    V: FromStr,
    <V as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    line.split(',')
        .map(|field| {
            let field = field.trim();
            field
                .parse::<V>()
                .with_context(|| format!("invalid number {:?}", field))
        })
        .collect()
}

impl<I, V> FromStr for Market<I, V>
where
    I: UnsignedInt,
    V: Value + FromStr,
    <V as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_market(s)
    }
}

/*!

This is the long-form manual for `wordsum_stats` and the `wordsum` command.

## Input

A spreadsheet (Excel `.xlsx` or `.csv`) with one respondent-year per row and a
header row naming the columns. The columns used are:

* `year` the survey year
* `wordsum` the vocabulary score, between 1 and 10
* `partyid` the party identification, as exported by the survey (`Strong democrat`, ...)
* `educ` the education level (education analyses only)
* `pres12`, `pres16`, `pres20` the presidential vote of the respondent (election analyses only)

## Cleaning

A cell is invalid if it is empty or if it holds one of the non-answers of the
export: `.n: No answer`, `.i: Inapplicable`, `.d: Do not Know/Cannot Choose`.
Whitespace around and inside these strings does not matter. A row with an
invalid cell is dropped entirely.

The `year` and `wordsum` columns are then read as numbers. Rows with a year
outside of the survey years (2010, 2012, 2014, 2018, 2022, 2024) or a score
outside of 1 to 10 are dropped as well.

For the education data, only `partyid` and `educ` are checked, and only
`.n: No answer` and blank cells invalidate `educ`.

## Party labels

The simple labels are `D`, `R` and `I`. Strong and not very strong democrats
are `D`, strong and not very strong republicans are `R`, everybody else is
`I`. This is lossy: leaners and third parties all end up in `I`.

The detailed labels keep the seven-point scale and merge the near-duplicate
spellings of the independent leaners. Anything else becomes `Other`. Whether
`Other` hides data-entry noise that belongs elsewhere cannot be decided from
the data alone.

## The 2-sigma threshold

For each parent population (all the respondents of a period, or all the voters
of an election), the threshold is the mean plus two standard deviations. A
score meets it when it is strictly greater. Since no score can be above 10, a
threshold above 10 is met by the scores equal to 10.

## Significance tests

Groups are compared two by two with Welch's t-test (two-sided, unequal
variances). A test needs at least two scores in each group and some spread in
at least one of them. Building without the default `ttest` feature removes the
tests; they are then reported as unavailable.

*/

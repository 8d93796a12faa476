//! English lexicon and bigram list.

/// Common English words, whitespace separated.
pub const WORDS: &str = "
a about above across act action actually add added address after again against age ago agree
agreement air all allow allowed almost alone along already also although always am amount an
analysis and annual another answer any anyone anything appear application apply approach april
are area areas around arrive art article as ask asked assets at attention august author
available average away back bad balance bank base based basis be became because become been
before began begin behind being believe below benefit benefits best better between beyond big
bill black board body book both box break bring brought build building business but buy by
call called came can capital car care carry case cash cause center central certain change
changes charge charges check child children choose city claim class clear close code cold
come comes coming committee common company compared complete condition conditions consider
contact contain contains content continue contract control corporation cost costs could
country course court cover create credit current customer customers data date day days dear
december decide decision deep department describe description design detail details
determine develop development did different direct director do document documents does doing
done door down due during each early east economic education effect effective either else
employee employees end energy enough enter entire environment equal equipment estimate even
event events ever every evidence example except expect expected expense expenses experience
fact family far february federal fee fees feel few field figure file final finance financial
find first five follow following food for force form former forward found four free from
front full fund funds further future gain general get give given go going good government
great green group growth had half hand happen hard has have having he head health hear held
help her here high him his history hold home hope hospital hour hours house how however human
idea if important in include included includes including income increase indicate industry
information insurance interest into investment is issue issues it item items its itself
january job join july june just keep kind know known land language large last late later law
lead learn least leave left legal less let letter level life light like likely limited line
list little live local long look loss low made main maintain major make management manager
many march market material matter may me mean means measure medical meet meeting member
members method might million mind minimum minute money month months more most move much
must my name national nature near need net network never new news next night no none nor
north not note notes nothing notice november now number numbers object october of off offer
office officer often old on once one only open operating operations or order other others our
out over own page paid part particular party pass past pay payable payment payments people
per percent perform performance period person personal place plan plans point policy position
possible power present president price prices principal prior private problem process
produce product products program project property provide provided public purchase purpose
put quality quarter question quite rate rates rather reach read ready real reason receive
received record records reduce reference regarding related release remain report reported
reports represent request require required requirements research reserve resource resources
respect response responsible rest result results return revenue review right risk room rule
rules run safety said sale sales same save say school section security see seem sell send
sense september serve service services set several shall share shares she short should show
side significant similar simple since single site situation small so social some someone
something sometimes soon source south space special specific staff stage standard start state
statement statements states status step still stock stop store story strategy street strong
structure study subject such summary supply support sure system systems table take taken tax
taxes team term terms test than thank that the their them then there therefore these they
thing things think third this those though three through time times title to today together
too total toward trade training transfer treatment true try turn two type under understand
unit united until up upon us use used user using value various very view wait want was water
way we week weeks well were west what when where whether which while white who whole whom
whose why will with within without word work working world would write year years yes yet you
young your
invoice account accounts customer vendor receipt quantity description shipping delivery
subtotal discount balance remittance reference number due date terms conditions signature
important notice notes please contact questions support email phone website online
";

/// Common word pairs, one pair per line.
pub const BIGRAMS: &str = "
of the
in the
to the
on the
for the
and the
at the
by the
with the
from the
is the
as the
that the
it is
this is
there is
will be
can be
has been
have been
is a
in a
for a
as a
to be
of a
such as
due date
total due
payment is
is due
due on
on receipt
the invoice
invoice total
total is
account number
invoice number
please contact
terms and
and conditions
more information
any questions
per cent
united states
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_are_lowercase_words() {
        assert!(WORDS.split_whitespace().all(|w| w.chars().all(|c| c.is_ascii_lowercase())));
        assert!(BIGRAMS
            .lines()
            .filter(|l| !l.trim().is_empty())
            .all(|l| l.split_whitespace().count() == 2));
    }
}
